//! Keyed access to stored players, rounds and reviews.

use tracing::{info, warn};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{
    CourseReview, CourseReviewStats, NewReview, NewRound, Player, PlayerId, ReviewId, Round,
    RoundId,
};

/// Read/write access to the data directory.
///
/// Writes rewrite whole files, so callers sharing one data directory
/// must serialize mutations themselves.
#[derive(Debug, Clone)]
pub struct Repository {
    config: StorageConfig,
}

impl Repository {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn reader<T: serde::de::DeserializeOwned>(&self, entity: EntityType) -> JsonlReader<T> {
        JsonlReader::for_entity(&self.config, entity)
    }

    fn writer<T: serde::Serialize>(&self, entity: EntityType) -> JsonlWriter<T> {
        JsonlWriter::for_entity(&self.config, entity)
    }

    // ── Players ─────────────────────────────────────────────────

    /// All players, alphabetically.
    pub fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        let mut players = self.reader::<Player>(EntityType::Player).read_all()?;
        players.sort_by_key(|p| p.name.to_lowercase());
        Ok(players)
    }

    pub fn get_player(&self, id: &PlayerId) -> Result<Player, StorageError> {
        self.reader::<Player>(EntityType::Player)
            .read_where(|p| &p.id == id)?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::not_found("Player", id.as_str()))
    }

    pub fn add_player(
        &self,
        name: &str,
        favorite_course: Option<&str>,
    ) -> Result<Player, StorageError> {
        let player = Player::new(name, favorite_course).ok_or(StorageError::MissingName)?;
        self.writer::<Player>(EntityType::Player).append(&player)?;
        info!(player_id = %player.id, "Added player {}", player.name);
        Ok(player)
    }

    /// Remove a player along with all of that player's rounds.
    ///
    /// `players.jsonl` is written first, so a failure part-way leaves
    /// orphaned rounds rather than a player with missing rounds. Reviews
    /// of the removed rounds are kept but detached from them.
    pub fn delete_player(&self, id: &PlayerId) -> Result<(), StorageError> {
        let mut players = self.reader::<Player>(EntityType::Player).read_all()?;
        let before = players.len();
        players.retain(|p| &p.id != id);
        if players.len() == before {
            return Err(StorageError::not_found("Player", id.as_str()));
        }

        let (removed, rounds): (Vec<Round>, Vec<Round>) = self
            .reader::<Round>(EntityType::Round)
            .read_all()?
            .into_iter()
            .partition(|r| &r.player_id == id);

        self.writer::<Player>(EntityType::Player).write_all(&players)?;
        self.writer::<Round>(EntityType::Round).write_all(&rounds)?;
        let removed_ids: Vec<RoundId> = removed.into_iter().map(|r| r.id).collect();
        let detached = self.detach_reviews(&removed_ids)?;
        info!(
            player_id = %id,
            detached_reviews = detached,
            "Deleted player and {} rounds",
            removed_ids.len()
        );
        Ok(())
    }

    // ── Rounds ──────────────────────────────────────────────────

    /// Every stored round, newest first.
    pub fn all_rounds(&self) -> Result<Vec<Round>, StorageError> {
        let mut rounds = self.reader::<Round>(EntityType::Round).read_all()?;
        sort_newest_first(&mut rounds);
        Ok(rounds)
    }

    /// One player's rounds, newest first.
    pub fn rounds_for_player(&self, player_id: &PlayerId) -> Result<Vec<Round>, StorageError> {
        let mut rounds = self
            .reader::<Round>(EntityType::Round)
            .read_where(|r| &r.player_id == player_id)?;
        sort_newest_first(&mut rounds);

        if let Some(bad) = rounds.iter().find(|r| r.slope <= 0) {
            warn!(
                round_id = %bad.id,
                slope = bad.slope,
                "Stored round has a non-positive slope; handicap will not be finite"
            );
        }
        Ok(rounds)
    }

    pub fn get_round(&self, id: &RoundId) -> Result<Round, StorageError> {
        self.reader::<Round>(EntityType::Round)
            .read_where(|r| &r.id == id)?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::not_found("Round", id.as_str()))
    }

    /// Validate and store a new round.
    ///
    /// Rejects rounds for unknown players and exact resubmissions of a
    /// round already stored.
    pub fn add_round(&self, new: NewRound) -> Result<Round, StorageError> {
        let round = new.validate()?;
        self.get_player(&round.player_id)?;

        let fingerprint = round.fingerprint();
        let existing = self.rounds_for_player(&round.player_id)?;
        if existing.iter().any(|r| r.fingerprint() == fingerprint) {
            return Err(StorageError::Duplicate(format!(
                "{} at {} on {}",
                round.score, round.course, round.date
            )));
        }

        self.writer::<Round>(EntityType::Round).append(&round)?;
        info!(
            round_id = %round.id,
            player_id = %round.player_id,
            "Added round: {} at {} ({})",
            round.score,
            round.course,
            round.date
        );
        Ok(round)
    }

    /// Replace the editable fields of a stored round.
    ///
    /// Rejects an edit that would make the round identical to another
    /// stored round.
    pub fn update_round(&self, id: &RoundId, new: NewRound) -> Result<Round, StorageError> {
        let replacement = new.validate()?;
        self.get_player(&replacement.player_id)?;

        let mut rounds = self.reader::<Round>(EntityType::Round).read_all()?;
        let fingerprint = replacement.fingerprint();
        if rounds
            .iter()
            .any(|r| &r.id != id && r.fingerprint() == fingerprint)
        {
            return Err(StorageError::Duplicate(format!(
                "{} at {} on {}",
                replacement.score, replacement.course, replacement.date
            )));
        }

        let slot = rounds
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StorageError::not_found("Round", id.as_str()))?;

        *slot = Round {
            id: slot.id.clone(),
            created_at: slot.created_at,
            ..replacement
        };
        let updated = slot.clone();

        self.writer::<Round>(EntityType::Round).write_all(&rounds)?;
        info!(round_id = %id, "Updated round");
        Ok(updated)
    }

    /// Remove a round. Reviews of it are kept with `round_id` cleared.
    pub fn delete_round(&self, id: &RoundId) -> Result<(), StorageError> {
        let mut rounds = self.reader::<Round>(EntityType::Round).read_all()?;
        let before = rounds.len();
        rounds.retain(|r| &r.id != id);
        if rounds.len() == before {
            return Err(StorageError::not_found("Round", id.as_str()));
        }

        self.writer::<Round>(EntityType::Round).write_all(&rounds)?;
        let detached = self.detach_reviews(std::slice::from_ref(id))?;
        info!(round_id = %id, detached_reviews = detached, "Deleted round");
        Ok(())
    }

    // ── Reviews ─────────────────────────────────────────────────

    /// All reviews, newest first.
    pub fn list_reviews(&self) -> Result<Vec<CourseReview>, StorageError> {
        let mut reviews = self.reader::<CourseReview>(EntityType::Review).read_all()?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    pub fn add_review(&self, new: NewReview) -> Result<CourseReview, StorageError> {
        let review = new.validate()?;
        if let Some(round_id) = &review.round_id {
            self.get_round(round_id)?;
        }

        self.writer::<CourseReview>(EntityType::Review).append(&review)?;
        info!(review_id = %review.id, "Added review for {}", review.course_name);
        Ok(review)
    }

    pub fn delete_review(&self, id: &ReviewId) -> Result<(), StorageError> {
        let mut reviews = self.reader::<CourseReview>(EntityType::Review).read_all()?;
        let before = reviews.len();
        reviews.retain(|r| &r.id != id);
        if reviews.len() == before {
            return Err(StorageError::not_found("Review", id.as_str()));
        }

        self.writer::<CourseReview>(EntityType::Review).write_all(&reviews)?;
        info!(review_id = %id, "Deleted review");
        Ok(())
    }

    /// Clear `round_id` on reviews of the given rounds. Returns how many
    /// reviews changed; the file is only rewritten when that is non-zero.
    fn detach_reviews(&self, round_ids: &[RoundId]) -> Result<usize, StorageError> {
        if round_ids.is_empty() {
            return Ok(0);
        }

        let mut reviews = self.reader::<CourseReview>(EntityType::Review).read_all()?;
        let mut detached = 0;
        for review in reviews.iter_mut() {
            if review
                .round_id
                .as_ref()
                .is_some_and(|rid| round_ids.contains(rid))
            {
                review.round_id = None;
                detached += 1;
            }
        }

        if detached > 0 {
            self.writer::<CourseReview>(EntityType::Review)
                .write_all(&reviews)?;
        }
        Ok(detached)
    }

    pub fn review_for_round(
        &self,
        round_id: &RoundId,
    ) -> Result<Option<CourseReview>, StorageError> {
        Ok(self
            .reader::<CourseReview>(EntityType::Review)
            .read_where(|r| r.round_id.as_ref() == Some(round_id))?
            .into_iter()
            .next())
    }

    pub fn course_stats(
        &self,
        course_name: &str,
    ) -> Result<Option<CourseReviewStats>, StorageError> {
        let reviews = self.list_reviews()?;
        Ok(CourseReviewStats::for_course(course_name, &reviews))
    }

    // ── Counts ──────────────────────────────────────────────────

    /// Stored record counts: (players, rounds, reviews).
    pub fn counts(&self) -> Result<(usize, usize, usize), StorageError> {
        Ok((
            self.reader::<Player>(EntityType::Player).count()?,
            self.reader::<Round>(EntityType::Round).count()?,
            self.reader::<CourseReview>(EntityType::Review).count()?,
        ))
    }
}

fn sort_newest_first(rounds: &mut [Round]) {
    rounds.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
