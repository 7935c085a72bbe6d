use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::transactions::Transaction;
use crate::ui::theme::{status_presentation, txn_status_color};

/// Read-only view of one transaction
pub struct TransactionDetailsDialog {
    pub visible: bool,
    transaction: Option<Transaction>,
}

impl TransactionDetailsDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            transaction: None,
        }
    }

    pub fn show(&mut self, transaction: Transaction) {
        self.transaction = Some(transaction);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.transaction = None;
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    fn field(label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:<17}", label), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ])
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }
        let Some(txn) = &self.transaction else {
            return;
        };

        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" Transaction {} ", txn.id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Fields
                Constraint::Min(4),    // Settlement stages
                Constraint::Length(1), // Footer
            ])
            .margin(1)
            .split(inner);

        let fields = vec![
            Line::from(vec![
                Span::styled(format!("{:<17}", "Status"), Style::default().fg(Color::Gray)),
                Span::styled(
                    txn.status.label(),
                    Style::default()
                        .fg(txn_status_color(txn.status))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Self::field("Date & Time", txn.date.format("%Y-%m-%d %H:%M").to_string()),
            Self::field("Processing Time", txn.processing_time_label().to_string()),
            Self::field("Recipient", txn.recipient.clone()),
            Self::field("Corridor", txn.corridor()),
            Self::field("Amount", format!("${:.2}", txn.amount_usd)),
            Self::field("Fee", format!("${:.2}", txn.fee_usd)),
        ];
        frame.render_widget(Paragraph::new(fields), chunks[0]);

        let stages: Vec<Line> = txn
            .settlement_stages()
            .iter()
            .map(|(label, status)| {
                let p = status_presentation(*status);
                Line::from(vec![
                    Span::styled(format!("{} ", p.glyph), Style::default().fg(p.color)),
                    Span::raw(format!("{}: {}", label, p.legend)),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(stages).block(
                Block::default()
                    .title(" Transaction Flow ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            ),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press any key to close",
                Style::default().fg(Color::Gray),
            )),
            chunks[2],
        );
    }
}
