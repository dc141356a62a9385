//! 订阅过期扫描调度器
//!
//! 每天在 `expiry_sweep_time` 时间点把 `end_date` 已过的 ACTIVE 订阅
//! 批量置为 EXPIRED，并为每条写入审计日志。
//!
//! 启动时立即扫描一次，停机期间漏掉的扫描在下次启动时补上。

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::repository::SubscriptionRepository;
use crate::utils::time;

/// 订阅过期扫描调度器
///
/// 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
pub struct SubscriptionExpirySweeper {
    state: ServerState,
}

impl SubscriptionExpirySweeper {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// 主循环：启动扫描 + 每日定点触发
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Subscription expiry sweeper started");

        // 启动时立即扫描一次
        self.sweep().await;

        loop {
            let sweep_time = time::parse_sweep_time(&self.state.config.expiry_sweep_time);
            let tz = self.state.config.timezone;
            let sleep_duration = Self::duration_until_next_sweep(sweep_time, tz);

            tracing::info!(
                "Next subscription expiry sweep in {} minutes (at {})",
                sleep_duration.as_secs() / 60,
                sweep_time.format("%H:%M")
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.sweep().await;
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Subscription expiry sweeper received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 扫描并过期订阅，逐条写入审计
    async fn sweep(&self) {
        let tz = self.state.config.timezone;
        let today = time::today_local(tz).format("%Y-%m-%d").to_string();

        let repo = SubscriptionRepository::new(self.state.db.clone());
        match repo.expire_overdue(&today).await {
            Ok(expired) if expired.is_empty() => {
                tracing::debug!("No overdue subscriptions");
            }
            Ok(expired) => {
                tracing::info!("Expired {} overdue subscription(s)", expired.len());
                for sub in &expired {
                    let id = sub.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
                    self.state
                        .audit
                        .log(
                            AuditAction::SubscriptionExpired,
                            "subscription",
                            id,
                            None,
                            None,
                            json!({
                                "member": sub.member.to_string(),
                                "member_name": sub.member_name,
                                "plan": sub.plan,
                                "end_date": sub.end_date,
                            }),
                        )
                        .await;
                }
            }
            Err(e) => {
                tracing::error!("Subscription expiry sweep failed: {}", e);
            }
        }
    }

    /// 计算距离下一次扫描时刻的 Duration
    fn duration_until_next_sweep(sweep_time: NaiveTime, tz: Tz) -> std::time::Duration {
        let now = chrono::Utc::now().with_timezone(&tz);
        let today = now.date_naive();

        let target_date = if now.time() >= sweep_time {
            // 今天的时刻已过，等明天
            today + chrono::Duration::days(1)
        } else {
            today
        };

        let target_datetime = target_date
            .and_time(sweep_time)
            .and_local_timezone(tz)
            .single()
            .unwrap_or_else(|| {
                // DST edge case: fallback to +1 min
                (target_date.and_time(sweep_time) + chrono::Duration::minutes(1))
                    .and_local_timezone(tz)
                    .latest()
                    .unwrap_or_else(|| {
                        // Ultimate fallback: use current time + 1 hour
                        tracing::error!(
                            "Cannot resolve local time for expiry sweep, using fallback"
                        );
                        now + chrono::Duration::hours(1)
                    })
            });

        let duration = target_datetime.signed_duration_since(now);
        if duration.num_seconds() <= 0 {
            // Safety: 不应该发生，但以防万一用 1 分钟兜底
            std::time::Duration::from_secs(60)
        } else {
            duration
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_until_next_sweep_is_within_a_day() {
        let tz = chrono_tz::Europe::Madrid;
        let sweep_time = NaiveTime::from_hms_opt(3, 30, 0).unwrap();
        let duration = SubscriptionExpirySweeper::duration_until_next_sweep(sweep_time, tz);
        assert!(duration.as_secs() > 0);
        // 最多 25 小时 (DST 回拨日)
        assert!(duration.as_secs() <= 25 * 3600);
    }
}
