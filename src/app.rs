use crate::config::{CONSOLE_WHEEL_RADIUS, PERCENTILE_GRACE};
use crate::core::input::{Command, parse_command};
use crate::core::network::ScoreService;
use crate::gameplay::color::WheelGeometry;
use crate::gameplay::leaderboard::Leaderboard;
use crate::gameplay::percentile::PercentileLookup;
use crate::gameplay::profile::{IdentityProvider, Profile};
use crate::gameplay::reconcile::{ReconcilePhase, ScoreReconciler};
use crate::gameplay::round::{RoundMachine, RoundPhase};
use crate::gameplay::target::TargetGenerator;
use crate::screens::{self, Screen, ScreenAction};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub struct App {
    profile: Profile,
    service: Arc<dyn ScoreService>,
    machine: RoundMachine,
    percentile: PercentileLookup,
    percentiles: HashMap<usize, u32>,
    reconciler: Option<ScoreReconciler>,
    leaderboard: Option<Leaderboard>,
    current_screen: Screen,
}

impl App {
    pub fn new(profile: Profile, service: Arc<dyn ScoreService>, generator: TargetGenerator) -> Self {
        Self {
            profile,
            service,
            machine: RoundMachine::new(generator, WheelGeometry::with_radius(CONSOLE_WHEEL_RADIUS)),
            percentile: PercentileLookup::new(),
            percentiles: HashMap::new(),
            reconciler: None,
            leaderboard: None,
            current_screen: Screen::Menu,
        }
    }

    pub fn screen(&self) -> Screen {
        self.current_screen
    }

    /// Reads commands until `quit` or end of input, printing the screen after each one.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.render())?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let Some(command) = parse_command(&line) else {
                writeln!(output, "unknown command, 'help' lists them")?;
                continue;
            };
            if command == Command::Help {
                writeln!(output, "{}", screens::HELP)?;
                continue;
            }
            if self.handle(command) == ScreenAction::Exit {
                break;
            }
            writeln!(output, "\n{}", self.render())?;
        }
        info!("Console session closed.");
        Ok(())
    }

    pub fn handle(&mut self, command: Command) -> ScreenAction {
        if command == Command::Quit {
            info!("Exit requested.");
            return ScreenAction::Exit;
        }
        if command == Command::Start {
            let action = self.start_game();
            return self.apply(action);
        }

        let action = match self.current_screen {
            Screen::Menu => ScreenAction::None,
            Screen::Round => self.handle_round(command),
            Screen::Result => self.handle_result(command),
            Screen::NameEntry => self.handle_name(command),
            Screen::SelectScore => self.handle_select_score(command),
            Screen::Leaderboard => self.handle_leaderboard(command),
        };
        self.apply(action)
    }

    fn apply(&mut self, action: ScreenAction) -> ScreenAction {
        if let ScreenAction::Navigate(screen) = action {
            if screen != self.current_screen {
                debug!("Navigating to {:?}", screen);
            }
            self.current_screen = screen;
        }
        action
    }

    fn start_game(&mut self) -> ScreenAction {
        self.machine.start();
        self.percentiles.clear();
        self.reconciler = None;
        self.leaderboard = None;
        ScreenAction::Navigate(Screen::Round)
    }

    fn handle_round(&mut self, command: Command) -> ScreenAction {
        match command {
            Command::Pick(point) => {
                self.machine.submit_pick(point);
                ScreenAction::None
            }
            Command::Confirm => match self.machine.confirm() {
                Some(accuracy) => {
                    if self.profile.engine.show_percentile {
                        let round = self.machine.session().rounds().len();
                        self.percentile.request(self.service.clone(), round, accuracy);
                        for report in self.percentile.wait_for(round, PERCENTILE_GRACE) {
                            self.percentiles.insert(report.round, report.percentile);
                        }
                    }
                    ScreenAction::Navigate(Screen::Result)
                }
                None => ScreenAction::None,
            },
            _ => ScreenAction::None,
        }
    }

    fn handle_result(&mut self, command: Command) -> ScreenAction {
        if command != Command::Next {
            return ScreenAction::None;
        }
        match self.machine.advance() {
            RoundPhase::InRound => ScreenAction::Navigate(Screen::Round),
            RoundPhase::Finished => ScreenAction::Navigate(Screen::NameEntry),
            _ => ScreenAction::None,
        }
    }

    fn handle_name(&mut self, command: Command) -> ScreenAction {
        let Command::Name(typed) = command else {
            return ScreenAction::None;
        };
        let Some(raw) = typed.or_else(|| self.profile.current_name()) else {
            return ScreenAction::None;
        };

        let nickname = match self.machine.claim_nickname(&raw) {
            Ok(nickname) => nickname.to_string(),
            Err(e) => {
                warn!("Rejected nickname '{}': {}", raw, e);
                return ScreenAction::None;
            }
        };

        let total = self.machine.session().total_score();
        self.reconciler = Some(ScoreReconciler::new(self.profile.engine.reconciliation, &nickname, total));
        self.save_score()
    }

    fn handle_select_score(&mut self, command: Command) -> ScreenAction {
        let Some(reconciler) = self.reconciler.as_mut() else {
            return ScreenAction::None;
        };
        match command {
            Command::Choose(index) => {
                reconciler.select(index);
                ScreenAction::None
            }
            Command::Confirm => {
                if reconciler.confirm(self.service.as_ref()).is_ok() && reconciler.is_done() {
                    self.show_leaderboard()
                } else {
                    ScreenAction::None
                }
            }
            _ => ScreenAction::None,
        }
    }

    fn handle_leaderboard(&mut self, command: Command) -> ScreenAction {
        let can_retry = self.reconciler.as_ref().is_some_and(|r| r.can_retry_save());
        if command == Command::Retry && can_retry {
            return self.save_score();
        }
        ScreenAction::None
    }

    // Runs (or reruns) reconciliation and routes to the prompt or the leaderboard.
    fn save_score(&mut self) -> ScreenAction {
        let Some(reconciler) = self.reconciler.as_mut() else {
            return ScreenAction::None;
        };
        let prompting = matches!(reconciler.run(self.service.as_ref()), ReconcilePhase::Choosing(_));
        if prompting {
            ScreenAction::Navigate(Screen::SelectScore)
        } else {
            self.show_leaderboard()
        }
    }

    fn show_leaderboard(&mut self) -> ScreenAction {
        self.leaderboard = Some(Leaderboard::fetch(self.service.as_ref()));
        ScreenAction::Navigate(Screen::Leaderboard)
    }

    fn collect_percentiles(&mut self) {
        for report in self.percentile.poll() {
            self.percentiles.insert(report.round, report.percentile);
        }
    }

    pub fn render(&mut self) -> String {
        self.collect_percentiles();
        let session = self.machine.session();

        match self.current_screen {
            Screen::Menu => screens::menu::render(),
            Screen::Round => match session.current_round() {
                Some(round) => screens::gameplay::render_round(
                    round,
                    session.total_score(),
                    self.machine.tentative_pick(),
                    self.machine.wheel(),
                ),
                None => screens::menu::render(),
            },
            Screen::Result => match session.current_round() {
                Some(round) => screens::gameplay::render_result(
                    round,
                    self.percentiles.get(&round.index).copied(),
                    self.machine.is_final_round(),
                ),
                None => screens::menu::render(),
            },
            Screen::NameEntry => {
                let scores: Vec<u32> = session.round_scores().collect();
                let suggested = self.profile.current_name();
                screens::name_entry::render(session.total_score(), &scores, suggested.as_deref())
            }
            Screen::SelectScore => match self.reconciler.as_ref().map(|r| r.phase()) {
                Some(ReconcilePhase::Choosing(choice)) => screens::select_score::render(choice),
                _ => String::new(),
            },
            Screen::Leaderboard => match (&self.leaderboard, &self.reconciler) {
                (Some(board), Some(reconciler)) => {
                    let highlight = board.highlight(reconciler.nickname(), reconciler.displayed_total());
                    screens::leaderboard::render(board, highlight, reconciler.can_retry_save())
                }
                (Some(board), None) => screens::leaderboard::render(board, None, false),
                _ => String::new(),
            },
        }
    }
}
