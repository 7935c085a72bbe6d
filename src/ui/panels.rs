use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

use super::form_field::TextInput;
use super::theme::{
    accent_color, card_color, status_legend, status_presentation, tier_color, txn_status_color,
};
use crate::flow::chart::{FlowChart, CHART_TOTAL_TIME};
use crate::flow::format_amount;
use crate::metrics::{MetricCard, Trend};
use crate::rewards::{leaderboard, Rewards, REDEEM_COST, TIP_AMOUNTS};
use crate::transactions::{totals, Transaction, TxnQuery};

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub struct HeaderBar<'a> {
    pub version: &'a str,
    /// Masked API key, `None` when no key is configured
    pub api_key: Option<&'a str>,
    pub now: chrono::DateTime<chrono::Local>,
}

impl HeaderBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let key_span = match self.api_key {
            Some(masked) => Span::styled(
                format!("API key {}", masked),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("No API key", Style::default().fg(Color::DarkGray)),
        };

        let line = Line::from(vec![
            Span::styled(
                " JX402 ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Cross-border payments "),
            Span::styled(
                format!("v{}", self.version),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  │  "),
            key_span,
            Span::raw("  │  "),
            Span::styled(
                self.now.format("%Y-%m-%d %H:%M:%S").to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

pub struct MetricsPanel {
    pub cards: Vec<MetricCard>,
}

impl MetricsPanel {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.cards.is_empty() {
            return;
        }

        let constraints: Vec<Constraint> = self
            .cards
            .iter()
            .map(|_| Constraint::Ratio(1, self.cards.len() as u32))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (card, col) in self.cards.iter().zip(cols.iter()) {
            let color = card_color(card.color);

            let mut title = vec![Span::raw(format!(" {} ", card.title))];
            if card.live {
                title.push(Span::styled("● LIVE ", Style::default().fg(Color::Green)));
            }

            let footer = match (card.change, card.trend, card.subtitle) {
                (Some(change), Some(trend), _) => {
                    let (arrow, trend_color) = match trend {
                        Trend::Up => ("▲", Color::Green),
                        Trend::Down => ("▼", Color::Red),
                    };
                    Span::styled(
                        format!("{} {}", arrow, change),
                        Style::default().fg(trend_color),
                    )
                }
                (Some(change), None, _) => Span::raw(change),
                (None, _, Some(subtitle)) => {
                    Span::styled(subtitle, Style::default().fg(Color::DarkGray))
                }
                (None, _, None) => Span::raw(""),
            };

            let body = Paragraph::new(vec![
                Line::from(Span::styled(
                    card.value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(footer),
            ])
            .block(
                Block::default()
                    .title(Line::from(title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
            frame.render_widget(body, *col);
        }
    }
}

pub struct FlowChartPanel {
    pub chart: FlowChart,
}

impl FlowChartPanel {
    pub fn new() -> Self {
        Self {
            chart: FlowChart::default(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(" Transaction Flow ")
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(2),    // Nodes
                Constraint::Length(1), // Selected description
                Constraint::Length(1), // Legend
            ])
            .split(inner);

        let selected = self.chart.selected_index();
        let lines: Vec<Line> = self
            .chart
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let status = status_presentation(node.status);
                let mut label_style = Style::default().fg(accent_color(node.accent));
                if selected == Some(i) {
                    label_style = label_style.add_modifier(Modifier::REVERSED);
                }

                let mut spans = vec![
                    Span::styled(format!(" {} ", status.glyph), Style::default().fg(status.color)),
                    Span::styled(node.label, label_style),
                ];
                if let Some(time) = node.time {
                    spans.push(Span::styled(
                        format!("  {}", time),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                if i + 1 < self.chart.nodes.len() {
                    spans.push(Span::styled("  →", Style::default().fg(Color::DarkGray)));
                }
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), rows[0]);

        if let Some(node) = self.chart.selected() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", node.description),
                    Style::default().fg(Color::White),
                )),
                rows[1],
            );
        }

        let (completed, pending, waiting) = self.chart.status_counts();
        let mut legend: Vec<Span> = status_legend()
            .iter()
            .zip([completed, pending, waiting])
            .flat_map(|(p, count)| {
                [
                    Span::styled(format!(" {} ", p.glyph), Style::default().fg(p.color)),
                    Span::styled(
                        format!("{} ({})", p.legend, count),
                        Style::default().fg(Color::Gray),
                    ),
                ]
            })
            .collect();
        legend.push(Span::styled(
            format!("   Total time: {}", CHART_TOTAL_TIME),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(Line::from(legend)), rows[2]);
    }
}

pub struct TransactionsPanel {
    pub transactions: Vec<Transaction>,
    pub query: TxnQuery,
    pub state: TableState,
    /// Search box contents; mirrored into `query.search` on every edit
    pub search: TextInput,
    /// Keys go to the search box while true
    pub searching: bool,
}

impl TransactionsPanel {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            query: TxnQuery::default(),
            state: TableState::default(),
            search: TextInput::default().with_max_length(32),
            searching: false,
        }
    }

    pub fn visible(&self) -> Vec<&Transaction> {
        self.query.apply(&self.transactions)
    }

    /// Select the first row of a freshly filtered view
    fn reset_selection(&mut self) {
        let len = self.visible().len();
        self.state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn cycle_corridor(&mut self) {
        self.query.corridor = self.query.corridor.cycle();
        self.reset_selection();
    }

    pub fn cycle_status(&mut self) {
        self.query.status = self.query.status.cycle();
        self.reset_selection();
    }

    pub fn toggle_sort(&mut self) {
        self.query.sort = self.query.sort.toggle();
        self.reset_selection();
    }

    pub fn start_search(&mut self) {
        self.searching = true;
    }

    /// Edit the search box; Enter keeps the query, Esc clears it
    pub fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.searching = false,
            KeyCode::Esc => {
                self.searching = false;
                self.search.set_value("");
            }
            key => {
                self.search.handle_key(key);
            }
        }
        if self.query.search != self.search.value() {
            self.query.search = self.search.value().to_string();
            self.reset_selection();
        }
    }

    pub fn selected(&self) -> Option<&Transaction> {
        let visible = self.visible();
        self.state.selected().and_then(|i| visible.get(i).copied())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let stats = totals(&self.transactions);
        let visible = self.query.apply(&self.transactions);

        let block = Block::default()
            .title(format!(
                " Transactions ({}/{}) - {} completed, {} processing, {} failed ",
                visible.len(),
                stats.count,
                stats.completed,
                stats.processing,
                stats.failed
            ))
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let search_style = if self.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let search_text = if self.search.value().is_empty() && !self.searching {
            "Search by ID or recipient...".to_string()
        } else {
            self.search.value().to_string()
        };
        let filters = Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:<30}", search_text), search_style),
            Span::raw(" │ "),
            Span::raw(self.query.corridor.label()),
            Span::raw(" │ "),
            Span::raw(self.query.status.label()),
            Span::raw(" │ "),
            Span::raw(self.query.sort.label()),
        ]);
        frame.render_widget(Paragraph::new(filters), rows_area[0]);
        if self.searching {
            frame.set_cursor_position((
                rows_area[0].x + 2 + self.search.cursor_pos() as u16,
                rows_area[0].y,
            ));
        }

        if visible.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "No transactions found",
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(Span::styled(
                        "Try adjusting your filters or search query",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .alignment(Alignment::Center),
                rows_area[1],
            );
            return;
        }

        let rows: Vec<Row> = visible
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.id.clone()),
                    Cell::from(t.date.format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(t.recipient.clone()),
                    Cell::from(t.corridor()),
                    Cell::from(format!("${:.2}", t.amount_usd)),
                    Cell::from(format!("${:.2}", t.fee_usd)),
                    Cell::from(t.processing_time_label().to_string()),
                    Cell::from(Span::styled(
                        t.status.label(),
                        Style::default().fg(txn_status_color(t.status)),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(17),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Length(11),
            ],
        )
        .header(
            Row::new(vec![
                "ID", "Date", "Recipient", "Corridor", "Amount", "Fee", "Time", "Status",
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(table, rows_area[1], &mut self.state);
    }
}

pub struct RewardsPanel {
    pub rewards: Rewards,
}

impl RewardsPanel {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" $HYPE Rewards ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Balance
                Constraint::Length(1), // Gold progress
                Constraint::Length(2), // Tips
                Constraint::Min(4),    // Leaderboard
                Constraint::Length(2), // Redeem
            ])
            .split(inner);

        let balance = self.rewards.balance();
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} $HYPE", format_amount(balance as f64)),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(
                        "Gold tier: {} more needed",
                        format_amount(self.rewards.remaining_to_gold() as f64)
                    ),
                    Style::default().fg(Color::Gray),
                )),
            ]),
            rows[0],
        );

        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Yellow))
                .ratio(self.rewards.progress())
                .label(format!("{:.0}%", self.rewards.progress() * 100.0)),
            rows[1],
        );

        let mut tips: Vec<Span> = TIP_AMOUNTS
            .iter()
            .enumerate()
            .flat_map(|(i, amount)| {
                [
                    Span::styled(format!("[{}]", i + 1), Style::default().fg(Color::Yellow)),
                    Span::raw(format!(" ${:.2}  ", amount)),
                ]
            })
            .collect();
        tips.insert(0, Span::styled("x402 tips ", Style::default().fg(Color::Magenta)));
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(tips),
                Line::from(Span::styled(
                    "Instant tips • Earn 10x $HYPE",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            rows[2],
        );

        let board: Vec<Line> = leaderboard(balance)
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let name_style = if entry.is_current_user {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{:<11}", entry.name), name_style),
                    Span::styled(
                        format!("{:<7}", entry.tier.label()),
                        Style::default().fg(tier_color(entry.tier)),
                    ),
                    Span::raw(format!("{} $HYPE", entry.rewards)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(board), rows[3]);

        let redeem = match self.rewards.redeem_shortfall() {
            None => Line::from(vec![
                Span::styled("[r]", Style::default().fg(Color::Yellow)),
                Span::raw(format!(" Redeem for fee rebate ({} $HYPE)", REDEEM_COST)),
            ]),
            Some(needed) => Line::from(Span::styled(
                format!("Need {} more $HYPE to redeem", needed),
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(redeem), rows[4]);
    }
}

pub struct StatusBar<'a> {
    pub message: Option<&'a str>,
    pub remit_enabled: bool,
}

impl StatusBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("[s]", Style::default().fg(Color::Yellow)),
            Span::raw("imulate  "),
            Span::styled("[f]", Style::default().fg(Color::Yellow)),
            Span::raw("ilter  "),
            Span::styled("[/]", Style::default().fg(Color::Yellow)),
            Span::raw(" search  "),
            Span::styled("[r]", Style::default().fg(Color::Yellow)),
            Span::raw("edeem  "),
            Span::styled("[?]", Style::default().fg(Color::Yellow)),
            Span::raw(" help  "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw("uit"),
        ];

        if self.remit_enabled {
            spans.push(Span::styled(
                "  │ remit on complete",
                Style::default().fg(Color::Magenta),
            ));
        }

        if let Some(message) = self.message {
            spans.push(Span::raw("  │ "));
            spans.push(Span::styled(message, Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Currency;
    use crate::transactions::{transaction_history, CorridorFilter};

    #[test]
    fn test_transactions_panel_filter_resets_selection() {
        let mut panel = TransactionsPanel::new(transaction_history());
        assert_eq!(panel.visible().len(), 10);
        assert!(panel.selected().is_none());

        panel.cycle_corridor();
        assert_eq!(panel.query.corridor, CorridorFilter::Only(Currency::Ngn));
        assert_eq!(panel.visible().len(), 4);
        assert_eq!(panel.selected().map(|t| t.id.as_str()), Some("TXN-8942"));

        panel.toggle_sort();
        assert_eq!(panel.selected().map(|t| t.id.as_str()), Some("TXN-8938"));
    }

    #[test]
    fn test_search_typing_filters_rows() {
        let mut panel = TransactionsPanel::new(transaction_history());
        panel.start_search();
        for c in "KWAME".chars() {
            panel.handle_search_key(KeyCode::Char(c));
        }
        assert!(panel.searching);
        assert_eq!(panel.query.search, "KWAME");
        assert_eq!(panel.selected().map(|t| t.id.as_str()), Some("TXN-8941"));

        // Enter keeps the query
        panel.handle_search_key(KeyCode::Enter);
        assert!(!panel.searching);
        assert_eq!(panel.visible().len(), 1);

        // Esc clears it
        panel.start_search();
        panel.handle_search_key(KeyCode::Esc);
        assert!(panel.query.search.is_empty());
        assert_eq!(panel.visible().len(), 10);
    }

    #[test]
    fn test_status_filter_with_no_rows_clears_selection() {
        let mut panel = TransactionsPanel::new(transaction_history());
        panel.cycle_corridor(); // USA-NGN
        panel.cycle_corridor(); // USA-GHS
        panel.cycle_status(); // Completed
        panel.cycle_status(); // Processing
        assert!(panel.visible().is_empty());
        assert!(panel.state.selected().is_none());
    }
}
