use crate::config::TOTAL_ROUNDS;
use crate::gameplay::accuracy;
use crate::gameplay::color::{ColorSample, Point, WheelGeometry};
use crate::gameplay::profile::{self, NicknameError};
use crate::gameplay::target::TargetGenerator;
use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    InRound,
    AwaitingConfirmation,
    RoundScored,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub index: usize,
    pub target: ColorSample,
    pub picked: Option<ColorSample>,
    pub score: Option<u32>,
}

impl Round {
    fn new(index: usize, target: ColorSample) -> Self {
        Self { index, target, picked: None, score: None }
    }

    pub fn is_complete(&self) -> bool {
        self.score.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSession {
    rounds: Vec<Round>,
    total_score: u32,
    nickname: Option<String>,
}

impl GameSession {
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn completed_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.is_complete()).count()
    }

    pub fn round_scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.rounds.iter().filter_map(|r| r.score)
    }
}

/// Drives one game session: targets, picks, scoring and the end-of-game handoff.
///
/// Every transition is guarded by the current phase. Calls that arrive in the wrong phase
/// are ignored and leave the session untouched.
pub struct RoundMachine<R: Rng = StdRng> {
    phase: RoundPhase,
    session: GameSession,
    tentative: Option<ColorSample>,
    generator: TargetGenerator<R>,
    wheel: WheelGeometry,
}

impl<R: Rng> RoundMachine<R> {
    pub fn new(generator: TargetGenerator<R>, wheel: WheelGeometry) -> Self {
        Self {
            phase: RoundPhase::Idle,
            session: GameSession::default(),
            tentative: None,
            generator,
            wheel,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn tentative_pick(&self) -> Option<ColorSample> {
        self.tentative
    }

    pub fn wheel(&self) -> WheelGeometry {
        self.wheel
    }

    pub fn set_wheel(&mut self, wheel: WheelGeometry) {
        self.wheel = wheel;
    }

    pub fn is_final_round(&self) -> bool {
        self.session.rounds.len() >= TOTAL_ROUNDS
    }

    pub fn start(&mut self) {
        self.session = GameSession::default();
        self.tentative = None;
        self.begin_round();
        info!("New session started.");
    }

    /// Returns the tentative color if the pick was accepted.
    pub fn submit_pick(&mut self, point: Point) -> Option<ColorSample> {
        if !matches!(self.phase, RoundPhase::InRound | RoundPhase::AwaitingConfirmation) {
            debug!("Ignoring pick in phase {:?}", self.phase);
            return None;
        }

        match self.wheel.point_to_color(point) {
            Ok(color) => {
                self.tentative = Some(color);
                self.phase = RoundPhase::AwaitingConfirmation;
                Some(color)
            }
            Err(e) => {
                debug!("Ignoring pick outside the wheel: {}", e);
                None
            }
        }
    }

    /// Scores the tentative pick. Returns the round score if the round was finalized.
    pub fn confirm(&mut self) -> Option<u32> {
        if self.phase != RoundPhase::AwaitingConfirmation {
            debug!("Ignoring confirm in phase {:?}", self.phase);
            return None;
        }
        let picked = self.tentative.take()?;
        let round = self.session.rounds.last_mut()?;

        let score = accuracy::score(round.target, picked);
        round.picked = Some(picked);
        round.score = Some(score);
        self.session.total_score += score;
        self.phase = RoundPhase::RoundScored;

        info!(
            "Round {} scored {} (target {}, picked {}), total {}",
            round.index, score, round.target, picked, self.session.total_score
        );
        Some(score)
    }

    pub fn advance(&mut self) -> RoundPhase {
        if self.phase != RoundPhase::RoundScored {
            debug!("Ignoring advance in phase {:?}", self.phase);
            return self.phase;
        }

        if self.session.completed_rounds() < TOTAL_ROUNDS {
            self.begin_round();
        } else {
            self.phase = RoundPhase::Finished;
            info!("Session finished with {} points.", self.session.total_score);
        }
        self.phase
    }

    /// Sets the session nickname. Only once, and only after the last round.
    pub fn claim_nickname(&mut self, raw: &str) -> Result<&str, NicknameError> {
        if self.phase != RoundPhase::Finished {
            return Err(NicknameError::NotFinished);
        }
        if self.session.nickname.is_some() {
            return Err(NicknameError::AlreadySet);
        }
        let nickname = profile::validate_nickname(raw)?;
        Ok(self.session.nickname.insert(nickname).as_str())
    }

    fn begin_round(&mut self) {
        let index = self.session.rounds.len() + 1;
        let target = self.generator.generate();
        debug!("Round {} target: {}", index, target);
        self.session.rounds.push(Round::new(index, target));
        self.tentative = None;
        self.phase = RoundPhase::InRound;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RoundMachine {
        RoundMachine::new(TargetGenerator::seeded(99), WheelGeometry::with_radius(100.0))
    }

    // Picks exactly the current target.
    fn pick_target(m: &mut RoundMachine) -> Option<ColorSample> {
        let target = m.session().current_round().unwrap().target;
        let point = m.wheel().color_to_point(target);
        m.submit_pick(point)
    }

    fn assert_total_matches(m: &RoundMachine) {
        let sum: u32 = m.session().round_scores().sum();
        assert_eq!(m.session().total_score(), sum);
    }

    #[test]
    fn starts_idle_and_ignores_everything() {
        let mut m = machine();
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert!(m.submit_pick(Point::new(100.0, 100.0)).is_none());
        assert!(m.confirm().is_none());
        assert_eq!(m.advance(), RoundPhase::Idle);
        assert!(m.session().rounds().is_empty());
    }

    #[test]
    fn start_creates_first_round() {
        let mut m = machine();
        m.start();
        assert_eq!(m.phase(), RoundPhase::InRound);
        let rounds = m.session().rounds();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].index, 1);
        assert!(rounds[0].picked.is_none() && rounds[0].score.is_none());
    }

    #[test]
    fn out_of_bounds_pick_changes_nothing() {
        let mut m = machine();
        m.start();
        assert!(m.submit_pick(Point::new(500.0, 500.0)).is_none());
        assert_eq!(m.phase(), RoundPhase::InRound);
        assert!(m.tentative_pick().is_none());

        pick_target(&mut m).unwrap();
        let before = m.tentative_pick();
        assert!(m.submit_pick(Point::new(-1.0, -1.0)).is_none());
        assert_eq!(m.phase(), RoundPhase::AwaitingConfirmation);
        assert_eq!(m.tentative_pick(), before);
    }

    #[test]
    fn repick_replaces_tentative_color() {
        let mut m = machine();
        m.start();
        let first = m.submit_pick(Point::new(150.0, 100.0)).unwrap();
        let second = m.submit_pick(Point::new(100.0, 150.0)).unwrap();
        assert_ne!(first, second);
        assert_eq!(m.tentative_pick(), Some(second));
        assert!(m.session().current_round().unwrap().picked.is_none());
    }

    #[test]
    fn confirm_requires_a_pick() {
        let mut m = machine();
        m.start();
        assert!(m.confirm().is_none());
        assert_eq!(m.phase(), RoundPhase::InRound);
        assert_eq!(m.session().total_score(), 0);
    }

    #[test]
    fn perfect_pick_scores_hundred() {
        let mut m = machine();
        m.start();
        pick_target(&mut m).unwrap();
        assert_eq!(m.confirm(), Some(100));
        assert_eq!(m.phase(), RoundPhase::RoundScored);
        let round = m.session().current_round().unwrap();
        assert_eq!(round.score, Some(100));
        assert!(round.picked.is_some());

        // confirming twice does not double count
        assert!(m.confirm().is_none());
        assert_eq!(m.session().total_score(), 100);
    }

    #[test]
    fn picks_after_scoring_are_ignored() {
        let mut m = machine();
        m.start();
        pick_target(&mut m).unwrap();
        m.confirm().unwrap();
        let round = m.session().current_round().unwrap().clone();
        assert!(m.submit_pick(Point::new(100.0, 100.0)).is_none());
        assert_eq!(m.session().current_round().unwrap(), &round);
    }

    #[test]
    fn full_game_never_exceeds_four_rounds() {
        let mut m = machine();
        m.start();
        let picks = [
            Point::new(100.0, 100.0),
            Point::new(190.0, 100.0),
            Point::new(100.0, 30.0),
            Point::new(40.0, 120.0),
        ];
        for (i, p) in picks.into_iter().enumerate() {
            assert_eq!(m.phase(), RoundPhase::InRound);
            assert_eq!(m.session().rounds().len(), i + 1);
            m.submit_pick(p).unwrap();
            m.confirm().unwrap();
            assert_total_matches(&m);
            let next = m.advance();
            if i + 1 < TOTAL_ROUNDS {
                assert_eq!(next, RoundPhase::InRound);
            } else {
                assert_eq!(next, RoundPhase::Finished);
            }
        }

        assert_eq!(m.session().rounds().len(), TOTAL_ROUNDS);
        assert_eq!(m.advance(), RoundPhase::Finished);
        assert_eq!(m.session().rounds().len(), TOTAL_ROUNDS);
        assert!(m.session().total_score() <= crate::config::MAX_TOTAL_SCORE);
        assert_total_matches(&m);

        let indices: Vec<usize> = m.session().rounds().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn finished_total_is_frozen_until_restart() {
        let mut m = machine();
        m.start();
        for _ in 0..TOTAL_ROUNDS {
            pick_target(&mut m).unwrap();
            m.confirm().unwrap();
            m.advance();
        }
        assert_eq!(m.phase(), RoundPhase::Finished);
        assert_eq!(m.session().total_score(), 400);

        assert!(m.submit_pick(Point::new(100.0, 100.0)).is_none());
        assert!(m.confirm().is_none());
        assert_eq!(m.session().total_score(), 400);

        m.start();
        assert_eq!(m.session().total_score(), 0);
        assert_eq!(m.session().rounds().len(), 1);
        assert!(m.session().nickname().is_none());
    }

    #[test]
    fn nickname_is_claimed_once_after_finishing() {
        let mut m = machine();
        m.start();
        assert_eq!(m.claim_nickname("ann"), Err(NicknameError::NotFinished));

        for _ in 0..TOTAL_ROUNDS {
            pick_target(&mut m).unwrap();
            m.confirm().unwrap();
            m.advance();
        }
        assert_eq!(m.claim_nickname("   "), Err(NicknameError::Empty));
        assert_eq!(m.claim_nickname("  ann "), Ok("ann"));
        assert_eq!(m.claim_nickname("bob"), Err(NicknameError::AlreadySet));
        assert_eq!(m.session().nickname(), Some("ann"));
    }

    #[test]
    fn resizing_the_wheel_rescales_picks() {
        let mut m = machine();
        m.start();
        m.set_wheel(WheelGeometry::with_radius(10.0));
        assert!(m.submit_pick(Point::new(150.0, 100.0)).is_none());
        let c = m.submit_pick(Point::new(20.0, 10.0)).unwrap();
        assert!((c.saturation - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nan_pick_is_ignored() {
        let mut m = machine();
        m.start();
        assert!(m.submit_pick(Point::new(f64::NAN, 50.0)).is_none());
        assert_eq!(m.phase(), RoundPhase::InRound);
        assert_eq!(m.confirm(), None);
        assert!(m.session().current_round().unwrap().picked.is_none());
    }
}
