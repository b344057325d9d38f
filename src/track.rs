//! # Pointer tracks
//!
//! A track follows one pen contact from `begin` to `end`. Only one exists at a time, as the message hook can only
//! see a single pen.

use std::time::Instant;

/// Identifies a track. Assigned from 1 upwards and never reused by the same provider, even across restarts.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrackId(pub(crate) u64);
impl TrackId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}
impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum TrackPhase {
    /// The pen is touching.
    Active,
    /// The pen has lifted. Tracks are only seen in this phase during their final `end` dispatch.
    Ended,
}

/// One pen contact, as handed to the host on every dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerTrack {
    id: TrackId,
    position: [f32; 2],
    phase: TrackPhase,
    started: Instant,
    ended: Option<Instant>,
}

impl PointerTrack {
    pub(crate) fn begin(id: TrackId, position: [f32; 2]) -> Self {
        Self {
            id,
            position,
            phase: TrackPhase::Active,
            started: Instant::now(),
            ended: None,
        }
    }
    pub(crate) fn move_to(&mut self, position: [f32; 2]) {
        self.position = position;
    }
    pub(crate) fn finish(&mut self) {
        self.phase = TrackPhase::Ended;
        self.ended = Some(Instant::now());
    }
    #[must_use]
    pub fn id(&self) -> TrackId {
        self.id
    }
    /// Same as [`Self::id`], the hook has no separate per-device identity to offer.
    #[must_use]
    pub fn uid(&self) -> TrackId {
        self.id
    }
    /// Name of the provider that produced this track.
    #[must_use]
    pub fn device(&self) -> &'static str {
        crate::PROVIDER_NAME
    }
    /// Latest position in client units, see [`PenEvent::position`](crate::events::PenEvent::position).
    #[must_use]
    pub fn position(&self) -> [f32; 2] {
        self.position
    }
    #[must_use]
    pub fn phase(&self) -> TrackPhase {
        self.phase
    }
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == TrackPhase::Active
    }
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started
    }
    #[must_use]
    pub fn ended_at(&self) -> Option<Instant> {
        self.ended
    }
    /// How long the pen has been (or was) down.
    #[must_use]
    pub fn duration(&self) -> std::time::Duration {
        self.ended.unwrap_or_else(Instant::now) - self.started
    }
}

impl std::fmt::Display for PointerTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y] = self.position;
        write!(
            f,
            "<WMPen id:{} uid:{} pos:({x}, {y}) device:{}>",
            self.id,
            self.uid(),
            self.device()
        )
    }
}
