//! Member / subscription / reservation rules against an in-memory database
//! Run: cargo test -p club-server --test membership_flow

use club_server::db::models::{
    AccessDenyReason, MemberCreate, ReservationStatus, ScheduleTemplateCreate, SiteCreate,
    SpaceCreate, SubscriptionStatus,
};
use club_server::db::repository::access::AccessEventInsert;
use club_server::db::repository::session::SessionInsert;
use club_server::db::repository::{
    AccessEventRepository, ClassSessionRepository, MemberRepository, RepoError,
    ReservationRepository, ScheduleTemplateRepository, SiteRepository, SpaceRepository,
    SubscriptionRepository,
};
use rust_decimal::Decimal;
use shared::util::now_millis;
use surrealdb::engine::local::{Db, Mem};
use surrealdb::{RecordId, Surreal};

async fn setup_db() -> Surreal<Db> {
    let db: Surreal<Db> = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db.query("DEFINE INDEX member_card_code ON TABLE member FIELDS card_code UNIQUE")
        .await
        .unwrap();
    db
}

async fn seed_member(db: &Surreal<Db>, first: &str, card: Option<&str>) -> RecordId {
    MemberRepository::new(db.clone())
        .create(MemberCreate {
            card_code: card.map(str::to_string),
            first_name: first.into(),
            last_name: "García".into(),
            email: None,
            phone: None,
            birth_date: None,
            photo_url: None,
            note: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

// ============================================================================
// Card codes
// ============================================================================

#[tokio::test]
async fn card_code_is_generated_when_missing() {
    let db = setup_db().await;
    let repo = MemberRepository::new(db.clone());

    let member = repo
        .create(MemberCreate {
            card_code: None,
            first_name: "Ana".into(),
            last_name: "García".into(),
            email: None,
            phone: None,
            birth_date: None,
            photo_url: None,
            note: None,
        })
        .await
        .unwrap();

    assert_eq!(member.card_code.len(), 10);
    assert!(member.card_code.chars().all(|c| c.is_ascii_digit()));

    // 生成的卡号立即可用于刷卡查询
    let found = repo.find_by_card_code(&member.card_code).await.unwrap();
    assert_eq!(found.unwrap().id, member.id);
}

#[tokio::test]
async fn duplicate_card_code_is_rejected() {
    let db = setup_db().await;
    let repo = MemberRepository::new(db.clone());

    seed_member(&db, "Ana", Some("CARD-001")).await;
    let err = repo
        .create(MemberCreate {
            card_code: Some("CARD-001".into()),
            first_name: "Luis".into(),
            last_name: "Pérez".into(),
            email: None,
            phone: None,
            birth_date: None,
            photo_url: None,
            note: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn search_matches_name_and_card() {
    let db = setup_db().await;
    let repo = MemberRepository::new(db.clone());
    seed_member(&db, "Ana", Some("CARD-001")).await;
    seed_member(&db, "Luis", Some("CARD-002")).await;

    let (by_name, total) = repo.search(Some("ana".into()), None, 20, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(by_name[0].first_name, "Ana");

    let (by_card, _) = repo.search(Some("CARD-002".into()), None, 20, 0).await.unwrap();
    assert_eq!(by_card.len(), 1);
    assert_eq!(by_card[0].first_name, "Luis");
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn active_subscription_covers_only_its_period() {
    let db = setup_db().await;
    let member = seed_member(&db, "Ana", None).await;
    let repo = SubscriptionRepository::new(db.clone());

    let sub = repo
        .create(
            member.clone(),
            "Ana García".into(),
            "mensual".into(),
            Decimal::new(3990, 2),
            "2025-06-01".into(),
            "2025-06-30".into(),
        )
        .await
        .unwrap();

    assert!(repo
        .find_active_covering(member.clone(), "2025-06-15")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_active_covering(member.clone(), "2025-07-01")
        .await
        .unwrap()
        .is_none());

    // 取消后即便日期在期内也不再放行
    repo.cancel(&sub.id.unwrap().to_string()).await.unwrap();
    assert!(repo
        .find_active_covering(member, "2025-06-15")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn overlap_lookup_sees_boundary_contact() {
    let db = setup_db().await;
    let member = seed_member(&db, "Ana", None).await;
    let repo = SubscriptionRepository::new(db.clone());

    repo.create(
        member.clone(),
        "Ana García".into(),
        "mensual".into(),
        Decimal::new(3990, 2),
        "2025-06-01".into(),
        "2025-06-30".into(),
    )
    .await
    .unwrap();

    // 首尾相接算重叠，隔一天不算
    assert!(repo
        .find_overlapping_active(member.clone(), "2025-06-30", "2025-07-31")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_overlapping_active(member, "2025-07-01", "2025-07-31")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn expiry_sweep_flips_only_overdue_periods() {
    let db = setup_db().await;
    let ana = seed_member(&db, "Ana", None).await;
    let luis = seed_member(&db, "Luis", None).await;
    let repo = SubscriptionRepository::new(db.clone());

    repo.create(
        ana,
        "Ana García".into(),
        "mensual".into(),
        Decimal::new(3990, 2),
        "2025-01-01".into(),
        "2025-01-31".into(),
    )
    .await
    .unwrap();
    repo.create(
        luis,
        "Luis García".into(),
        "anual".into(),
        Decimal::new(39900, 2),
        "2025-01-01".into(),
        "2025-12-31".into(),
    )
    .await
    .unwrap();

    let expired = repo.expire_overdue("2025-06-01").await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].plan, "mensual");
    assert_eq!(expired[0].status, SubscriptionStatus::Expired);
    assert_eq!(repo.count_active().await.unwrap(), 1);

    // 再跑一遍没有新变化
    assert!(repo.expire_overdue("2025-06-01").await.unwrap().is_empty());
}

// ============================================================================
// Reservations
// ============================================================================

async fn seed_session(db: &Surreal<Db>, capacity: u32) -> RecordId {
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
            kind: None,
            capacity: 20,
        })
        .await
        .unwrap();
    let space_id = space.id.unwrap();
    let template = ScheduleTemplateRepository::new(db.clone())
        .create(ScheduleTemplateCreate {
            activity: "Yoga".into(),
            space: space_id.clone(),
            coach: None,
            weekday: 0,
            start_time: "10:00".into(),
            end_time: "11:00".into(),
            capacity: Some(capacity),
            valid_from: "2025-06-01".into(),
            valid_until: "2025-06-30".into(),
        })
        .await
        .unwrap();

    ClassSessionRepository::new(db.clone())
        .create(SessionInsert {
            template: template.id.unwrap(),
            date: "2025-06-02".into(),
            activity: "Yoga".into(),
            space: space_id,
            space_name: "Studio 1".into(),
            coach: None,
            coach_name: None,
            start_time: "10:00".into(),
            end_time: "11:00".into(),
            capacity,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn reservations_hold_and_release_seats() {
    let db = setup_db().await;
    let session = seed_session(&db, 2).await;
    let ana = seed_member(&db, "Ana", None).await;
    let luis = seed_member(&db, "Luis", None).await;
    let repo = ReservationRepository::new(db.clone());

    let r1 = repo
        .create(session.clone(), ana.clone(), "Ana García".into())
        .await
        .unwrap();
    repo.create(session.clone(), luis.clone(), "Luis García".into())
        .await
        .unwrap();

    assert_eq!(repo.count_active_by_session(session.clone()).await.unwrap(), 2);
    assert!(repo
        .find_active_for(session.clone(), ana.clone())
        .await
        .unwrap()
        .is_some());

    // 取消释放名额，名下活跃预约消失
    let cancelled = repo.cancel(&r1.id.unwrap().to_string()).await.unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(repo.count_active_by_session(session.clone()).await.unwrap(), 1);
    assert!(repo
        .find_active_for(session, ana)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn cancelled_reservation_cannot_be_cancelled_again() {
    let db = setup_db().await;
    let session = seed_session(&db, 2).await;
    let ana = seed_member(&db, "Ana", None).await;
    let repo = ReservationRepository::new(db.clone());

    let r = repo
        .create(session, ana, "Ana García".into())
        .await
        .unwrap();
    let id = r.id.unwrap().to_string();
    repo.cancel(&id).await.unwrap();

    assert!(matches!(
        repo.cancel(&id).await.unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[tokio::test]
async fn check_in_marks_attendance() {
    let db = setup_db().await;
    let session = seed_session(&db, 2).await;
    let ana = seed_member(&db, "Ana", None).await;
    let repo = ReservationRepository::new(db.clone());

    let r = repo
        .create(session.clone(), ana, "Ana García".into())
        .await
        .unwrap();
    let attended = repo.check_in(&r.id.unwrap().to_string()).await.unwrap();

    assert_eq!(attended.status, ReservationStatus::Attended);
    assert!(attended.attended_at.is_some());

    // 已签到的预约不再占用可订名额
    assert_eq!(repo.count_active_by_session(session).await.unwrap(), 0);
}

// ============================================================================
// Access events
// ============================================================================

#[tokio::test]
async fn access_counters_split_by_outcome() {
    let db = setup_db().await;
    let ana = seed_member(&db, "Ana", None).await;
    let repo = AccessEventRepository::new(db.clone());

    repo.record(AccessEventInsert {
        card_code: "CARD-001".into(),
        member: Some(ana.clone()),
        member_name: Some("Ana García".into()),
        photo_url: None,
        granted: true,
        deny_reason: None,
        subscription: None,
    })
    .await
    .unwrap();
    repo.record(AccessEventInsert {
        card_code: "CARD-001".into(),
        member: Some(ana),
        member_name: Some("Ana García".into()),
        photo_url: None,
        granted: true,
        deny_reason: None,
        subscription: None,
    })
    .await
    .unwrap();
    repo.record(AccessEventInsert {
        card_code: "CARD-999".into(),
        member: None,
        member_name: None,
        photo_url: None,
        granted: false,
        deny_reason: Some(AccessDenyReason::UnknownCard),
        subscription: None,
    })
    .await
    .unwrap();

    let start = now_millis() - 60_000;
    let end = now_millis() + 60_000;
    assert_eq!(repo.count_in_range(start, end, Some(true)).await.unwrap(), 2);
    assert_eq!(repo.count_in_range(start, end, Some(false)).await.unwrap(), 1);
    assert_eq!(repo.count_in_range(start, end, None).await.unwrap(), 3);

    // 同一会员刷两次只算一个人
    assert_eq!(
        repo.count_unique_members_in_range(start, end).await.unwrap(),
        1
    );

    let recent = repo.find_recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].card_code, "CARD-999", "newest first");
}
