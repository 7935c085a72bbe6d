use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::panels::{
    FlowChartPanel, HeaderBar, MetricsPanel, RewardsPanel, StatusBar, TransactionsPanel,
};
use crate::config::Config;
use crate::metrics::overview_metrics;
use crate::rewards::{Rewards, TIP_AMOUNTS};
use crate::transactions::{transaction_history, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    FlowChart,
    Transactions,
}

pub struct Dashboard {
    pub metrics_panel: MetricsPanel,
    pub flow_panel: FlowChartPanel,
    pub transactions_panel: TransactionsPanel,
    pub rewards_panel: RewardsPanel,
    pub focused: FocusedPanel,
    /// Masked API key shown in the header
    pub api_key: Option<String>,
    pub remit_enabled: bool,
    pub status_message: Option<String>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        Self {
            metrics_panel: MetricsPanel {
                cards: overview_metrics(),
            },
            flow_panel: FlowChartPanel::new(),
            transactions_panel: TransactionsPanel::new(transaction_history()),
            rewards_panel: RewardsPanel {
                rewards: Rewards::default(),
            },
            focused: FocusedPanel::FlowChart,
            api_key: config.api.masked_key(),
            remit_enabled: config.api.remit_on_complete && config.api.has_key(),
            status_message: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(4), // Metric cards
                Constraint::Min(17),   // Flow chart, transactions, rewards
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(60), Constraint::Length(40)])
            .split(chunks[2]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(11), Constraint::Min(6)])
            .split(body[0]);

        let header = HeaderBar {
            version: env!("CARGO_PKG_VERSION"),
            api_key: self.api_key.as_deref(),
            now: chrono::Local::now(),
        };
        header.render(frame, chunks[0]);

        self.metrics_panel.render(frame, chunks[1]);

        self.flow_panel
            .render(frame, main[0], self.focused == FocusedPanel::FlowChart);

        self.transactions_panel.render(
            frame,
            main[1],
            self.focused == FocusedPanel::Transactions,
        );

        self.rewards_panel.render(frame, body[1]);

        let status = StatusBar {
            message: self.status_message.as_deref(),
            remit_enabled: self.remit_enabled,
        };
        status.render(frame, chunks[3]);
    }

    pub fn focus_next(&mut self) {
        self.focused = match self.focused {
            FocusedPanel::FlowChart => FocusedPanel::Transactions,
            FocusedPanel::Transactions => FocusedPanel::FlowChart,
        };
    }

    pub fn focus_prev(&mut self) {
        // Only two panels, so prev and next coincide
        self.focus_next();
    }

    pub fn select_next(&mut self) {
        match self.focused {
            FocusedPanel::FlowChart => self.flow_panel.chart.select_next(),
            FocusedPanel::Transactions => {
                let len = self.transactions_panel.visible().len();
                if len > 0 {
                    let state = &mut self.transactions_panel.state;
                    let i = state
                        .selected()
                        .map_or(0, |i| if i >= len - 1 { 0 } else { i + 1 });
                    state.select(Some(i));
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focused {
            FocusedPanel::FlowChart => self.flow_panel.chart.select_prev(),
            FocusedPanel::Transactions => {
                let len = self.transactions_panel.visible().len();
                if len > 0 {
                    let state = &mut self.transactions_panel.state;
                    let i = state
                        .selected()
                        .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
                    state.select(Some(i));
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        match self.focused {
            FocusedPanel::FlowChart => self.flow_panel.chart.clear_selection(),
            FocusedPanel::Transactions => self.transactions_panel.state.select(None),
        }
    }

    pub fn cycle_corridor(&mut self) {
        self.transactions_panel.cycle_corridor();
        let label = self.transactions_panel.query.corridor.label();
        self.set_status(format!("Showing {}", label));
    }

    pub fn cycle_status(&mut self) {
        self.transactions_panel.cycle_status();
        let label = self.transactions_panel.query.status.label();
        self.set_status(format!("Showing {}", label));
    }

    pub fn toggle_sort(&mut self) {
        self.transactions_panel.toggle_sort();
        let label = self.transactions_panel.query.sort.label();
        self.set_status(label);
    }

    /// Focus the transactions table and open its search box
    pub fn start_search(&mut self) {
        self.focused = FocusedPanel::Transactions;
        self.transactions_panel.start_search();
    }

    /// Send the tip at `index` in [`TIP_AMOUNTS`]
    pub fn tip(&mut self, index: usize) {
        let Some(&amount) = TIP_AMOUNTS.get(index) else {
            return;
        };
        let earned = self.rewards_panel.rewards.tip(amount);
        self.set_status(format!("Sent ${:.2} tip! +{} $HYPE earned", amount, earned));
    }

    pub fn redeem(&mut self) {
        match self.rewards_panel.rewards.redeem() {
            Ok(_) => self.set_status("Redeemed 500 $HYPE for fee rebate!"),
            Err(e) => {
                tracing::debug!(error = %e, "Redeem refused");
                self.set_status(format!("Cannot redeem: {}", e));
            }
        }
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        if self.focused == FocusedPanel::Transactions {
            self.transactions_panel.selected()
        } else {
            None
        }
    }
}
