mod common;

use chrono::Duration;
use collegehub::{
    auth::Denial,
    domain::*,
    error::AppError,
    repository::EventRepository,
};

fn new_event(days: i64) -> CreateEventRequest {
    CreateEventRequest {
        title: "Hack Night".to_string(),
        description: "Bring a laptop".to_string(),
        location: "Lab 3".to_string(),
        date: common::base_time() + Duration::days(days),
        registration_deadline: None,
        capacity: 20,
    }
}

#[tokio::test]
async fn test_leader_creates_pending_event() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let leader = t.user("lena", Role::Student).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    t.member(&leader, &club, MembershipRole::Leader).await?;

    let event = t.ctx.event_service.create_event(&leader, club.id, new_event(7)).await?;
    assert_eq!(event.status, ApprovalStatus::Pending);
    assert_eq!(event.created_by, Some(leader.id));
    assert_eq!(event.approved_by, None);

    Ok(())
}

#[tokio::test]
async fn test_create_event_rejects_bad_dates() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let student = t.user("sam", Role::Student).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let service = &t.ctx.event_service;

    let err = service.create_event(&student, club.id, new_event(7)).await.unwrap_err();
    assert!(matches!(err, AppError::Permission(Denial::NotClubManager)));

    let err = service.create_event(&admin, club.id, new_event(-1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut late_deadline = new_event(7);
    late_deadline.registration_deadline = Some(common::base_time() + Duration::days(8));
    let err = service.create_event(&admin, club.id, late_deadline).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut untitled = new_event(7);
    untitled.title = String::new();
    let err = service.create_event(&admin, club.id, untitled).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn test_only_club_advisor_approves_events() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let advisor = t.user("prof", Role::Faculty).await?;
    let admin = t.user("ada", Role::Admin).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    t.member(&advisor, &club, MembershipRole::FacultyAdvisor).await?;
    let event = t.event(&club, &admin, 7, 0).await?;

    let service = &t.ctx.event_service;
    let err = service.approve_event(&admin, event.id).await.unwrap_err();
    assert!(matches!(err, AppError::Permission(Denial::NotFacultyAdvisor)));

    let approved = service.approve_event(&advisor, event.id).await?;
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert_eq!(approved.approved_by, Some(advisor.id));

    let rejected = service.reject_event(&advisor, event.id).await?;
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert_eq!(rejected.approved_by, None);
    assert_eq!(rejected.approved_at, None);

    Ok(())
}

#[tokio::test]
async fn test_full_event_refuses_registration() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let first = t.user("finn", Role::Student).await?;
    let second = t.user("sean", Role::Student).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let event = t.event(&club, &admin, 7, 1).await?;

    let service = &t.ctx.event_service;
    assert!(matches!(service.register(&first, event.id).await?, RegisterOutcome::Registered(_)));

    let err = service.register(&second, event.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "This event is full."));
    assert!(t.ctx.event_repo.find_registration(event.id, second.id).await?.is_none());

    let detail = service.get(event.id).await?;
    assert_eq!(detail.registration_count, 1);
    assert!(detail.is_full);

    Ok(())
}

#[tokio::test]
async fn test_deadline_and_past_events_refuse_registration() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let student = t.user("sam", Role::Student).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let closed = t
        .event_with_deadline(&club, &admin, 3, 0, Some(common::base_time() - Duration::hours(1)))
        .await?;
    let tomorrow = t.event(&club, &admin, 1, 0).await?;

    let service = &t.ctx.event_service;
    let err = service.register(&student, closed.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Registration deadline has passed."));

    t.clock.advance(Duration::days(2));
    let err = service.register(&student, tomorrow.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "This event has already passed."));

    Ok(())
}

#[tokio::test]
async fn test_register_twice_and_cancel_are_idempotent() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let student = t.user("sam", Role::Student).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let event = t.event(&club, &admin, 7, 0).await?;

    let service = &t.ctx.event_service;
    service.register(&student, event.id).await?;
    assert_eq!(service.register(&student, event.id).await?, RegisterOutcome::AlreadyRegistered);
    assert_eq!(t.ctx.event_repo.registration_count(event.id).await?, 1);

    assert_eq!(service.registered_upcoming(&student).await?.len(), 1);

    assert_eq!(service.cancel(&student, event.id).await?, CancelOutcome::Cancelled);
    assert_eq!(service.cancel(&student, event.id).await?, CancelOutcome::NotRegistered);
    assert!(service.registered_upcoming(&student).await?.is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_never_oversell() -> anyhow::Result<()> {
    let t = common::setup_file_backed().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let event = t.event(&club, &admin, 7, 3).await?;

    let mut students = Vec::new();
    for i in 0..10 {
        students.push(t.user(&format!("student{}", i), Role::Student).await?);
    }

    let mut handles = Vec::new();
    for student in students {
        let ctx = t.ctx.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            ctx.event_service.register(&student, event_id).await
        }));
    }

    let mut registered = 0;
    for handle in handles {
        match handle.await? {
            Ok(RegisterOutcome::Registered(_)) => registered += 1,
            Ok(other) => panic!("unexpected outcome {:?}", other),
            Err(AppError::Validation(msg)) => assert_eq!(msg, "This event is full."),
            Err(e) => return Err(e.into()),
        }
    }

    assert_eq!(registered, 3);
    assert_eq!(t.ctx.event_repo.registration_count(event.id).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_upcoming_search_and_club_listing() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let club = t.club("Robotics", Category::Technical).await?;
    let soon = t.event(&club, &admin, 1, 0).await?;
    let later = t.event(&club, &admin, 10, 0).await?;

    let service = &t.ctx.event_service;
    let upcoming = service.upcoming(None, 50).await?;
    assert_eq!(upcoming.iter().map(|e| e.id).collect::<Vec<_>>(), vec![soon.id, later.id]);

    let searched = service.upcoming(Some("+10d"), 50).await?;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, later.id);

    let listed = service.club_events(club.id).await?;
    assert_eq!(listed.first().map(|e| e.id), Some(later.id));

    t.clock.advance(Duration::days(5));
    assert_eq!(service.upcoming(None, 50).await?.len(), 1);

    Ok(())
}
