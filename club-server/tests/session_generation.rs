//! Schedule template expansion against an in-memory database
//! Run: cargo test -p club-server --test session_generation

use club_server::db::models::{
    ScheduleTemplateCreate, ScheduleTemplateUpdate, SiteCreate, SpaceCreate,
};
use club_server::db::repository::{
    ClassSessionRepository, ScheduleTemplateRepository, SiteRepository, SpaceRepository,
};
use club_server::scheduling::GenerationService;
use surrealdb::engine::local::{Db, Mem};
use surrealdb::{RecordId, Surreal};

async fn setup_db() -> Surreal<Db> {
    let db: Surreal<Db> = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    // 生成幂等性依赖的唯一索引，与生产 schema 一致
    db.query("DEFINE INDEX session_template_date ON TABLE class_session FIELDS template, date UNIQUE")
        .await
        .unwrap();
    db
}

async fn seed_space(db: &Surreal<Db>, capacity: u32) -> RecordId {
    let site = SiteRepository::new(db.clone())
        .create(SiteCreate {
            name: "Main".into(),
            address: None,
            phone: None,
            opening_hours: None,
        })
        .await
        .unwrap();
    let space = SpaceRepository::new(db.clone())
        .create(SpaceCreate {
            site: site.id.unwrap(),
            name: "Studio 1".into(),
            kind: Some("studio".into()),
            capacity,
        })
        .await
        .unwrap();
    space.id.unwrap()
}

fn spinning_template(space: RecordId) -> ScheduleTemplateCreate {
    // 周一 18:00，整个 2025-06 有效
    ScheduleTemplateCreate {
        activity: "Spinning".into(),
        space,
        coach: None,
        weekday: 0,
        start_time: "18:00".into(),
        end_time: "19:00".into(),
        capacity: None,
        valid_from: "2025-06-01".into(),
        valid_until: "2025-06-30".into(),
    }
}

#[tokio::test]
async fn generates_one_session_per_occurrence() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(spinning_template(space))
        .await
        .unwrap();
    let template_id = template.id.clone().unwrap();

    let service = GenerationService::new(db.clone());
    let report = service
        .generate_for_template(&template_id.to_string(), "2025-06-01", "2025-06-30")
        .await
        .unwrap();

    // 2025-06 的周一: 02, 09, 16, 23, 30
    assert_eq!(report.examined, 5);
    assert_eq!(report.created, 5);
    assert_eq!(report.skipped_existing, 0);

    let sessions = ClassSessionRepository::new(db.clone())
        .find_in_range("2025-06-01", "2025-06-30", None, None, None)
        .await
        .unwrap();
    assert_eq!(sessions.len(), 5);
    assert_eq!(sessions[0].date, "2025-06-02");
    assert_eq!(sessions[0].activity, "Spinning");
    assert_eq!(sessions[0].space_name, "Studio 1");
    // 模板未设容量，回退到教室容量
    assert_eq!(sessions[0].capacity, 20);
    assert_eq!(sessions[0].start_time, "18:00");
}

#[tokio::test]
async fn second_run_skips_every_existing_session() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(spinning_template(space))
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    let service = GenerationService::new(db.clone());
    service
        .generate_for_template(&id, "2025-06-01", "2025-06-30")
        .await
        .unwrap();
    let second = service
        .generate_for_template(&id, "2025-06-01", "2025-06-30")
        .await
        .unwrap();

    assert_eq!(second.created, 0);
    assert_eq!(second.skipped_existing, 5);

    let sessions = ClassSessionRepository::new(db.clone())
        .find_in_range("2025-06-01", "2025-06-30", None, None, None)
        .await
        .unwrap();
    assert_eq!(sessions.len(), 5, "no duplicates after rerun");
}

#[tokio::test]
async fn extending_the_window_only_adds_missing_dates() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(spinning_template(space))
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    let service = GenerationService::new(db.clone());
    service
        .generate_for_template(&id, "2025-06-01", "2025-06-14")
        .await
        .unwrap();
    let extended = service
        .generate_for_template(&id, "2025-06-01", "2025-06-30")
        .await
        .unwrap();

    assert_eq!(extended.examined, 5);
    assert_eq!(extended.created, 3);
    assert_eq!(extended.skipped_existing, 2);
}

#[tokio::test]
async fn window_is_clamped_to_template_validity() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let mut create = spinning_template(space);
    create.valid_from = "2025-06-01".into();
    create.valid_until = "2025-06-08".into();
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(create)
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    let service = GenerationService::new(db.clone());
    let report = service
        .generate_for_template(&id, "2025-05-01", "2025-07-31")
        .await
        .unwrap();

    // 有效期内只有 06-02 这一个周一
    assert_eq!(report.examined, 1);
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn disjoint_validity_creates_nothing() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(spinning_template(space))
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    let service = GenerationService::new(db.clone());
    let report = service
        .generate_for_template(&id, "2025-08-01", "2025-08-31")
        .await
        .unwrap();

    assert_eq!(report.examined, 0);
    assert_eq!(report.created, 0);
    assert_eq!(report.skipped_existing, 0);
}

#[tokio::test]
async fn inactive_template_is_rejected() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let repo = ScheduleTemplateRepository::new(db.clone());
    let template = repo.create(spinning_template(space)).await.unwrap();
    let id = template.id.unwrap().to_string();

    repo.update(
        &id,
        ScheduleTemplateUpdate {
            activity: None,
            coach: None,
            weekday: None,
            start_time: None,
            end_time: None,
            capacity: None,
            valid_from: None,
            valid_until: None,
            is_active: Some(false),
        },
    )
    .await
    .unwrap();

    let service = GenerationService::new(db.clone());
    let err = service
        .generate_for_template(&id, "2025-06-01", "2025-06-30")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Inactive"));
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(spinning_template(space))
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    let service = GenerationService::new(db.clone());
    let result = service
        .generate_for_template(&id, "2025-06-30", "2025-06-01")
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn template_capacity_overrides_space_capacity() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let mut create = spinning_template(space);
    create.capacity = Some(8);
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(create)
        .await
        .unwrap();
    let id = template.id.unwrap().to_string();

    GenerationService::new(db.clone())
        .generate_for_template(&id, "2025-06-02", "2025-06-02")
        .await
        .unwrap();

    let sessions = ClassSessionRepository::new(db.clone())
        .find_in_range("2025-06-02", "2025-06-02", None, None, None)
        .await
        .unwrap();
    assert_eq!(sessions[0].capacity, 8);
}

#[tokio::test]
async fn generate_all_covers_every_active_template() {
    let db = setup_db().await;
    let space = seed_space(&db, 20).await;
    let repo = ScheduleTemplateRepository::new(db.clone());

    repo.create(spinning_template(space.clone())).await.unwrap();
    let mut yoga = spinning_template(space);
    yoga.activity = "Yoga".into();
    yoga.weekday = 2; // 周三
    repo.create(yoga).await.unwrap();

    let service = GenerationService::new(db.clone());
    let report = service
        .generate_all("2025-06-01", "2025-06-14")
        .await
        .unwrap();

    // 两周窗口: 周一 02/09 + 周三 04/11
    assert_eq!(report.examined, 4);
    assert_eq!(report.created, 4);

    let sessions = ClassSessionRepository::new(db.clone())
        .find_in_range("2025-06-01", "2025-06-14", None, None, Some("yoga".into()))
        .await
        .unwrap();
    assert_eq!(sessions.len(), 2, "activity filter narrows to yoga");
}
