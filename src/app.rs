use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{dispatch_remit, RemitApi, RemitClient, RemitRequest};
use crate::config::Config;
use crate::flow::Summary;
use crate::ui::dialogs::{HelpDialog, SimulatorDialog, TransactionDetailsDialog};
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::Dashboard;

pub struct App {
    config: Config,
    dashboard: Dashboard,
    help_dialog: HelpDialog,
    simulator: SimulatorDialog,
    details: TransactionDetailsDialog,
    /// Remit client, present only when remits are enabled and a key is set
    remit_api: Option<Arc<dyn RemitApi>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let remit_api = if config.api.remit_on_complete {
            match RemitClient::from_config(&config.api)? {
                Some(client) => {
                    tracing::info!(base_url = %config.api.base_url, "Remit on complete enabled");
                    Some(Arc::new(client) as Arc<dyn RemitApi>)
                }
                None => {
                    tracing::warn!("remit_on_complete is set but no API key is configured");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self::with_remit_api(config, remit_api))
    }

    /// Build an app with an explicit remit backend
    pub fn with_remit_api(config: Config, remit_api: Option<Arc<dyn RemitApi>>) -> Self {
        let dashboard = Dashboard::new(&config);
        let simulator =
            SimulatorDialog::new(config.simulation.rates, &config.ui.default_amount);

        Self {
            config,
            dashboard,
            help_dialog: HelpDialog::new(),
            simulator,
            details: TransactionDetailsDialog::new(),
            remit_api,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms.max(10));

        while !self.should_quit {
            terminal.draw(|f| {
                self.dashboard.render(f);
                self.simulator.render(f);
                self.details.render(f);
                self.help_dialog.render(f);
            })?;

            // crossterm polling blocks, so keep it off the runtime threads
            let key = tokio::task::block_in_place(|| -> Result<Option<KeyCode>> {
                if event::poll(tick_rate)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            return Ok(Some(key.code));
                        }
                    }
                }
                Ok(None)
            })?;

            if let Some(code) = key {
                self.handle_key(code);
            }

            self.tick();
        }

        terminal.show_cursor()?;
        Ok(())
    }

    /// Pick up simulator completions
    fn tick(&mut self) {
        if let Some(summary) = self.simulator.poll() {
            self.on_simulation_complete(&summary);
        }
    }

    fn on_simulation_complete(&mut self, summary: &Summary) {
        tracing::info!(
            amount = summary.amount_usd,
            currency = %summary.currency,
            elapsed_ms = summary.actual_elapsed.as_millis() as u64,
            "Simulation complete"
        );
        self.dashboard.set_status(summary.headline());

        if let Some(api) = &self.remit_api {
            dispatch_remit(Arc::clone(api), RemitRequest::from_summary(summary));
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        // Any key closes help
        if self.help_dialog.visible {
            self.help_dialog.toggle();
            return;
        }

        if self.details.visible {
            self.details.hide();
            return;
        }

        if self.simulator.visible {
            self.simulator.handle_key(key);
            return;
        }

        if self.dashboard.transactions_panel.searching {
            self.dashboard.transactions_panel.handle_search_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.simulator.show(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.dashboard.cycle_corridor(),
            KeyCode::Char('t') => self.dashboard.cycle_status(),
            KeyCode::Char('o') => self.dashboard.toggle_sort(),
            KeyCode::Char('/') => self.dashboard.start_search(),
            KeyCode::Char(c @ '1'..='4') => self.dashboard.tip(c as usize - '1' as usize),
            KeyCode::Char('r') => self.dashboard.redeem(),
            KeyCode::Enter => {
                if let Some(txn) = self.dashboard.selected_transaction() {
                    self.details.show(txn.clone());
                }
            }
            KeyCode::Tab => self.dashboard.focus_next(),
            KeyCode::BackTab => self.dashboard.focus_prev(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.dashboard.select_next()
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.dashboard.select_prev()
            }
            KeyCode::Esc => self.dashboard.clear_selection(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        requests: Mutex<Vec<RemitRequest>>,
    }

    #[async_trait]
    impl RemitApi for RecordingApi {
        async fn remit(&self, request: &RemitRequest) -> Result<serde_json::Value, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    #[test]
    fn test_quit_key() {
        let mut app = App::with_remit_api(Config::default(), None);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_swallows_keys_until_closed() {
        let mut app = App::with_remit_api(Config::default(), None);
        app.handle_key(KeyCode::Char('?'));
        assert!(app.help_dialog.visible);

        // q closes help rather than quitting
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.help_dialog.visible);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let mut app = App::with_remit_api(Config::default(), None);
        app.handle_key(KeyCode::Char('/'));
        assert!(app.dashboard.transactions_panel.searching);

        // q and r are typed into the search box
        for c in "qr".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        assert_eq!(app.dashboard.transactions_panel.query.search, "qr");
        assert_eq!(app.dashboard.rewards_panel.rewards.balance(), 1247);

        app.handle_key(KeyCode::Esc);
        assert!(!app.dashboard.transactions_panel.searching);
        assert!(app.dashboard.transactions_panel.query.search.is_empty());
    }

    #[test]
    fn test_tip_and_redeem_keys() {
        let mut app = App::with_remit_api(Config::default(), None);
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.dashboard.rewards_panel.rewards.balance(), 1252);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.dashboard.rewards_panel.rewards.balance(), 752);
    }

    #[test]
    fn test_enter_opens_transaction_details() {
        let mut app = App::with_remit_api(Config::default(), None);

        // Nothing selected yet
        app.handle_key(KeyCode::Enter);
        assert!(!app.details.visible);

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert!(app.details.visible);
        assert_eq!(
            app.details.transaction().map(|t| t.id.as_str()),
            Some("TXN-8942")
        );

        // Any key closes details without acting on it
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.details.visible);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_simulator_keys_routed_to_dialog() {
        let mut app = App::with_remit_api(Config::default(), None);
        app.handle_key(KeyCode::Char('s'));
        assert!(app.simulator.visible);

        // q is typed into the dialog, not treated as quit
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc);
        assert!(!app.simulator.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_simulation_dispatches_remit() {
        let api = Arc::new(RecordingApi::default());
        let mut app = App::with_remit_api(
            Config::default(),
            Some(Arc::clone(&api) as Arc<dyn RemitApi>),
        );

        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Enter);

        tokio::time::sleep(Duration::from_millis(8400)).await;
        tokio::task::yield_now().await;
        app.tick();

        // Let the dispatched remit task run
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, 100.0);
        assert_eq!(requests[0].corridor, "USA-NGN");
        assert!(app
            .dashboard
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("$100 USD")));
    }
}
