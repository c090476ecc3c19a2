use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Config;
use crate::input::InputSignal;
use crate::pattern::Pattern;
use crate::pattern::token::{self, Token};
use crate::session::{SessionEvent, SessionOrchestrator};
use crate::stats::StatsAggregator;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Trainer,
    Stats,
}

/// Status line shown under the pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
    Mistake { expected: String },
    Finished { elapsed: Duration, new_best: bool },
    Requeued { resets: u32 },
}

pub struct App {
    pub screen: AppScreen,
    pub session: SessionOrchestrator,
    pub theme: Theme,
    pub feedback: Option<Feedback>,
    pub save_failed: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        theme: Theme,
        patterns: Vec<Pattern>,
        stats: StatsAggregator,
    ) -> Self {
        let session = SessionOrchestrator::new(patterns, stats, config.advance_delay());
        Self {
            screen: AppScreen::Trainer,
            session,
            theme,
            feedback: None,
            save_failed: false,
            should_quit: false,
        }
    }

    pub fn in_session(&self) -> bool {
        self.session.is_running()
    }

    pub fn handle_signal(&mut self, signal: InputSignal, now: Instant) {
        match signal {
            InputSignal::Quit => self.should_quit = true,
            InputSignal::Begin => {
                self.screen = AppScreen::Trainer;
                self.feedback = None;
                self.session.start(now);
                self.note_session_end();
            }
            InputSignal::Abort => {
                self.session.stop(now);
                self.feedback = None;
                self.note_session_end();
            }
            InputSignal::ShowStats => self.screen = AppScreen::Stats,
            InputSignal::Back => {
                if self.screen == AppScreen::Stats {
                    self.screen = AppScreen::Trainer;
                } else {
                    self.should_quit = true;
                }
            }
            InputSignal::Token(token) => {
                if let Some(event) = self.session.submit(token, now) {
                    self.apply(event);
                }
            }
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Accepted => {}
            SessionEvent::Mistake { mistake, saved } => {
                self.save_failed = !saved;
                self.feedback = Some(Feedback::Mistake {
                    expected: mistake
                        .expected
                        .map_or_else(|| token::UNKNOWN_TOKEN.to_string(), Token::icon),
                });
            }
            SessionEvent::PatternFinished {
                completion,
                new_best,
                saved,
            } => {
                self.save_failed = !saved;
                self.feedback = Some(if completion.is_perfect() {
                    Feedback::Finished {
                        elapsed: completion.elapsed,
                        new_best,
                    }
                } else {
                    Feedback::Requeued {
                        resets: completion.reset_count,
                    }
                });
            }
        }
    }

    /// Called on every loop iteration to fire the deferred advance.
    pub fn tick(&mut self, now: Instant) {
        if self.session.poll(now) {
            debug!("advanced to next pattern");
            self.feedback = None;
            self.note_session_end();
        }
    }

    fn note_session_end(&mut self) {
        if let Some(summary) = self.session.last_summary() {
            self.save_failed = !summary.saved;
        }
    }
}
