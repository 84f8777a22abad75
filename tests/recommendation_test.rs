mod common;

use collegehub::{domain::*, repository::EventRepository};

async fn fill(t: &common::TestContext, club: &Club, prefix: &str, count: usize) -> anyhow::Result<()> {
    for i in 0..count {
        let user = t.user(&format!("{}{}", prefix, i), Role::Student).await?;
        t.member(&user, club, MembershipRole::Member).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_category_match_outranks_popularity() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let user = t.user("uma", Role::Student).await?;
    let c1 = t.club("Coding", Category::Technical).await?;
    let c2 = t.club("Dance", Category::Cultural).await?;
    let c3 = t.club("Electronics", Category::Technical).await?;

    t.member(&user, &c1, MembershipRole::Member).await?;
    fill(&t, &c2, "dancer", 10).await?;
    fill(&t, &c3, "maker", 5).await?;

    let recommended = t.ctx.recommendation_service.recommended_clubs(&user).await?;
    let ids: Vec<_> = recommended.iter().map(|c| c.club.id).collect();
    assert_eq!(ids, vec![c3.id]);
    assert_eq!(recommended[0].member_count, 5);

    Ok(())
}

#[tokio::test]
async fn test_clubs_fall_back_to_most_joined() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let user = t.user("newbie", Role::Student).await?;
    let small = t.club("Origami", Category::Cultural).await?;
    let big = t.club("Football", Category::Sports).await?;
    let requested = t.club("Debate", Category::Academic).await?;

    fill(&t, &small, "folder", 1).await?;
    fill(&t, &big, "player", 3).await?;
    fill(&t, &requested, "speaker", 5).await?;
    t.pending(&user, &requested).await?;

    let recommended = t.ctx.recommendation_service.recommended_clubs(&user).await?;
    let ids: Vec<_> = recommended.iter().map(|c| c.club.id).collect();
    assert_eq!(ids, vec![big.id, small.id]);

    Ok(())
}

#[tokio::test]
async fn test_events_from_own_clubs_soonest_first() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let user = t.user("uma", Role::Student).await?;
    let mine = t.club("Coding", Category::Technical).await?;
    let other = t.club("Dance", Category::Cultural).await?;
    t.member(&user, &mine, MembershipRole::Member).await?;

    let later = t.event(&mine, &admin, 9, 0).await?;
    let sooner = t.event(&mine, &admin, 2, 0).await?;
    let attending = t.event(&mine, &admin, 4, 0).await?;
    t.event(&other, &admin, 1, 0).await?;
    t.ctx.event_service.register(&user, attending.id).await?;

    let recommended = t.ctx.recommendation_service.recommended_events(&user).await?;
    let ids: Vec<_> = recommended.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);

    Ok(())
}

#[tokio::test]
async fn test_event_approval_status_does_not_filter_recommendations() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let user = t.user("uma", Role::Student).await?;
    let club = t.club("Coding", Category::Technical).await?;
    t.member(&user, &club, MembershipRole::Member).await?;

    let pending = t.event(&club, &admin, 2, 0).await?;
    let rejected = t.event(&club, &admin, 5, 0).await?;
    t.ctx.event_repo.reject(rejected.id, common::base_time()).await?;

    let recommended = t.ctx.recommendation_service.recommended_events(&user).await?;
    let ids: Vec<_> = recommended.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![pending.id, rejected.id]);

    Ok(())
}

#[tokio::test]
async fn test_events_fall_back_to_most_registered() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let user = t.user("loner", Role::Student).await?;
    let club = t.club("Dance", Category::Cultural).await?;

    let quiet = t.event(&club, &admin, 1, 0).await?;
    let busy = t.event(&club, &admin, 6, 0).await?;
    for i in 0..3 {
        let fan = t.user(&format!("fan{}", i), Role::Student).await?;
        t.ctx.event_service.register(&fan, busy.id).await?;
    }

    let recommended = t.ctx.recommendation_service.recommended_events(&user).await?;
    let ids: Vec<_> = recommended.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![busy.id, quiet.id]);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_collects_everything() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let user = t.user("uma", Role::Student).await?;
    let mine = t.club("Coding", Category::Technical).await?;
    let suggested = t.club("Electronics", Category::Technical).await?;
    fill(&t, &suggested, "maker", 2).await?;
    t.member(&user, &mine, MembershipRole::Member).await?;

    let attending = t.event(&mine, &admin, 3, 0).await?;
    t.ctx.event_service.register(&user, attending.id).await?;

    let dashboard = t.ctx.dashboard_service.dashboard(&user).await?;
    assert_eq!(dashboard.clubs.len(), 1);
    assert_eq!(dashboard.upcoming_events.len(), 1);
    assert_eq!(dashboard.recommended_clubs.len(), 1);
    assert_eq!(dashboard.recommended_clubs[0].club.id, suggested.id);

    Ok(())
}
