mod common;

use common::{add_player, setup_storage};
use rusty_matchplay::model::{
    HalfPoints, Handicap, HoleScore, LeagueState, MatchUpdate, NewMatch, PlayerUpdate, Team,
};
use rusty_matchplay::storage::Storage;

#[tokio::test]
async fn test_player_crud() -> Result<(), Box<dyn std::error::Error>> {
    let storage = setup_storage().await?;
    assert!(storage.get_players().await?.is_empty());

    let alex = add_player(&storage, "Alex", Team::Home, 5).await?;
    let liam = add_player(&storage, "Liam", Team::Away, 12).await?;
    assert_eq!(storage.get_players().await?.len(), 2);
    assert_eq!(storage.get_player(alex.id).await?, Some(alex.clone()));

    let updated = storage
        .update_player(
            liam.id,
            &PlayerUpdate {
                handicap: Some(Handicap::from(10_u32)),
                ..PlayerUpdate::default()
            },
        )
        .await?;
    assert_eq!(updated.handicap.get(), 10);
    assert_eq!(updated.name, "Liam");
    assert_eq!(updated.team, Team::Away);

    storage.delete_player(alex.id).await?;
    assert_eq!(storage.get_player(alex.id).await?, None);
    assert!(storage.delete_player(alex.id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_deleting_player_empties_seat() -> Result<(), Box<dyn std::error::Error>> {
    let storage = setup_storage().await?;
    let alex = add_player(&storage, "Alex", Team::Home, 5).await?;
    let liam = add_player(&storage, "Liam", Team::Away, 12).await?;
    let m = storage
        .create_match(&NewMatch {
            player_a_id: Some(alex.id),
            player_b_id: Some(liam.id),
            counts: true,
            tee_time: Some("08:10".to_string()),
            notes: None,
        })
        .await?;
    storage
        .upsert_score(&HoleScore::new(m.id, 1, Some(4), Some(5))?)
        .await?;

    storage.delete_player(liam.id).await?;
    let after = storage.get_match(m.id).await?.ok_or("match vanished")?;
    assert_eq!(after.player_a_id, Some(alex.id));
    assert_eq!(after.player_b_id, None);
    assert_eq!(storage.get_scores(m.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_match_update_keeps_unset_fields() -> Result<(), Box<dyn std::error::Error>> {
    let storage = setup_storage().await?;
    let alex = add_player(&storage, "Alex", Team::Home, 5).await?;
    let m = storage
        .create_match(&NewMatch {
            player_a_id: Some(alex.id),
            player_b_id: None,
            counts: true,
            tee_time: Some("09:00".to_string()),
            notes: Some("front nine first".to_string()),
        })
        .await?;

    let updated = storage
        .update_match(
            m.id,
            &MatchUpdate {
                counts: Some(false),
                ..MatchUpdate::default()
            },
        )
        .await?;
    assert!(!updated.counts);
    assert_eq!(updated.player_a_id, Some(alex.id));
    assert_eq!(updated.tee_time.as_deref(), Some("09:00"));
    assert_eq!(updated.notes.as_deref(), Some("front nine first"));

    let cleared = storage
        .update_match(
            m.id,
            &MatchUpdate {
                player_a_id: Some(None),
                ..MatchUpdate::default()
            },
        )
        .await?;
    assert_eq!(cleared.player_a_id, None);
    assert!(!cleared.counts);
    assert_eq!(cleared.tee_time.as_deref(), Some("09:00"));
    Ok(())
}

#[tokio::test]
async fn test_score_upsert_replaces_record() -> Result<(), Box<dyn std::error::Error>> {
    let storage = setup_storage().await?;
    let m = storage
        .create_match(&NewMatch {
            player_a_id: None,
            player_b_id: None,
            counts: false,
            tee_time: None,
            notes: None,
        })
        .await?;

    storage
        .upsert_score(&HoleScore::new(m.id, 7, Some(4), None)?)
        .await?;
    storage
        .upsert_score(&HoleScore::new(m.id, 3, Some(5), Some(5))?)
        .await?;
    storage
        .upsert_score(&HoleScore::new(m.id, 7, Some(4), Some(3))?)
        .await?;

    let scores = storage.get_scores(m.id).await?;
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].hole.get(), 3);
    assert_eq!(scores[1].hole.get(), 7);
    assert_eq!(scores[1].gross_b, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_league_state_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let storage = setup_storage().await?;
    assert!(storage.get_league_state().await?.is_none());

    let stored = storage
        .update_league_state(&LeagueState {
            home_base_points: HalfPoints::try_from(2.5)?,
            away_base_points: HalfPoints::from_whole(1),
            updated_at: None,
        })
        .await?;
    assert_eq!(stored.home_base_points.to_string(), "2.5");
    assert_eq!(stored.away_base_points, HalfPoints::from_whole(1));
    assert!(stored.updated_at.is_some());

    let again = storage.get_league_state().await?.ok_or("no league state")?;
    assert_eq!(again.home_base_points, stored.home_base_points);
    Ok(())
}
