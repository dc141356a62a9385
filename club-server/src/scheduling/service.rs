//! 课次生成服务
//!
//! 把周课表模板在日期区间内展开成具体课次。
//! (template, date) 唯一索引保证重复执行不产生重复课次。

use chrono::NaiveDate;
use serde::Serialize;

use super::expansion::{clamp_window, occurrences};
use crate::db::models::{ScheduleTemplate, chrono_weekday};
use crate::db::repository::{
    ClassSessionRepository, EmployeeRepository, ScheduleTemplateRepository, SpaceRepository,
};
use crate::db::repository::session::SessionInsert;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 一次生成操作的统计结果
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GenerationReport {
    /// 展开得到的候选日期数
    pub examined: u32,
    /// 新建课次数
    pub created: u32,
    /// 已存在而跳过的课次数
    pub skipped_existing: u32,
}

impl GenerationReport {
    fn merge(&mut self, other: GenerationReport) {
        self.examined += other.examined;
        self.created += other.created;
        self.skipped_existing += other.skipped_existing;
    }
}

/// 课次生成服务
pub struct GenerationService {
    templates: ScheduleTemplateRepository,
    sessions: ClassSessionRepository,
    spaces: SpaceRepository,
    employees: EmployeeRepository,
}

impl GenerationService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            templates: ScheduleTemplateRepository::new(db.clone()),
            sessions: ClassSessionRepository::new(db.clone()),
            spaces: SpaceRepository::new(db.clone()),
            employees: EmployeeRepository::new(db),
        }
    }

    /// 为单个模板生成课次
    ///
    /// 模板必须处于激活状态。过去的日期不做限制，补录历史课次是
    /// 合法操作。
    pub async fn generate_for_template(
        &self,
        template_id: &str,
        from: &str,
        to: &str,
    ) -> AppResult<GenerationReport> {
        let (from, to) = parse_window(from, to)?;
        let template = self
            .templates
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule template"))?;

        if !template.is_active {
            return Err(AppError::business_rule(
                "Inactive schedule templates cannot generate sessions",
            ));
        }

        self.expand_one(&template, from, to).await
    }

    /// 为所有激活模板生成课次
    pub async fn generate_all(&self, from: &str, to: &str) -> AppResult<GenerationReport> {
        let (from, to) = parse_window(from, to)?;
        let mut report = GenerationReport::default();
        for template in self.templates.find_active().await? {
            report.merge(self.expand_one(&template, from, to).await?);
        }
        Ok(report)
    }

    async fn expand_one(
        &self,
        template: &ScheduleTemplate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<GenerationReport> {
        let template_id = template
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Schedule template missing ID"))?;

        let valid_from = parse_date(&template.valid_from)?;
        let valid_until = parse_date(&template.valid_until)?;
        let Some((start, end)) = clamp_window(valid_from, valid_until, from, to) else {
            return Ok(GenerationReport::default());
        };

        let weekday = chrono_weekday(template.weekday).ok_or_else(|| {
            AppError::validation(format!("Invalid weekday {} on template", template.weekday))
        })?;
        let dates = occurrences(weekday, start, end);

        // 课次快照：教室名、教练名与容量在生成时定格
        let space = self
            .spaces
            .find_by_id(&template.space.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Space"))?;
        let capacity = template.capacity.unwrap_or(space.capacity);

        let (coach, coach_name) = match &template.coach {
            Some(coach_id) => {
                let name = self
                    .employees
                    .find_by_id(&coach_id.to_string())
                    .await?
                    .map(|e| e.display_name);
                (Some(coach_id.clone()), name)
            }
            None => (None, None),
        };

        let mut report = GenerationReport {
            examined: dates.len() as u32,
            ..Default::default()
        };

        for date in dates {
            let date_str = date.format("%Y-%m-%d").to_string();
            let existing = self
                .sessions
                .find_by_template_and_date(template_id.clone(), &date_str)
                .await?;
            if existing.is_some() {
                report.skipped_existing += 1;
                continue;
            }

            let insert = SessionInsert {
                template: template_id.clone(),
                date: date_str.clone(),
                activity: template.activity.clone(),
                space: template.space.clone(),
                space_name: space.name.clone(),
                coach: coach.clone(),
                coach_name: coach_name.clone(),
                start_time: template.start_time.clone(),
                end_time: template.end_time.clone(),
                capacity,
            };

            match self.sessions.create(insert).await {
                Ok(_) => report.created += 1,
                Err(e) => {
                    // 并发生成撞上唯一索引：复查后归类为已存在
                    let lost_race = self
                        .sessions
                        .find_by_template_and_date(template_id.clone(), &date_str)
                        .await?
                        .is_some();
                    if lost_race {
                        report.skipped_existing += 1;
                    } else {
                        return Err(e.into());
                    }
                }
            }
        }

        Ok(report)
    }
}

fn parse_window(from: &str, to: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    if from > to {
        return Err(AppError::new(ErrorCode::GenerationWindowInvalid));
    }
    Ok((from, to))
}
