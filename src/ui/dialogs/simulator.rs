//! Quick-action remittance simulator dialog.
//!
//! The dialog owns its [`StepSequencer`], so closing or dropping it cancels
//! any run in flight.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use tokio::sync::mpsc::error::TryRecvError;

use super::centered_rect;
use crate::flow::{
    format_amount, Currency, ExchangeRates, Phase, RunHandle, RunSnapshot, SequencerEvent,
    SimulationParams, StepSequencer, Summary, FLAT_FEE_USD,
};
use crate::ui::form_field::TextInput;
use crate::ui::theme::status_presentation;

/// Which input has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorFocus {
    Amount,
    Currency,
}

pub struct SimulatorDialog {
    pub visible: bool,
    pub focus: SimulatorFocus,
    amount: TextInput,
    currency: Currency,
    sequencer: StepSequencer,
    run: Option<RunHandle>,
}

impl SimulatorDialog {
    pub fn new(rates: ExchangeRates, default_amount: &str) -> Self {
        Self {
            visible: false,
            focus: SimulatorFocus::Amount,
            amount: TextInput::new(default_amount).with_max_length(16),
            currency: Currency::Ngn,
            sequencer: StepSequencer::new(rates),
            run: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.focus = SimulatorFocus::Amount;
    }

    /// Close the dialog, cancelling any run in flight
    pub fn hide(&mut self) {
        self.visible = false;
        self.run = None;
        self.sequencer.cancel();
    }

    pub fn amount_input(&self) -> &str {
        self.amount.value()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.sequencer.snapshot()
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams::from_input(self.amount.value(), self.currency)
    }

    /// Recipient amount for the current inputs
    pub fn preview_converted(&self) -> f64 {
        let params = self.params();
        self.sequencer.rates().convert(params.amount, params.currency)
    }

    /// Start (or restart) a run with the current inputs
    pub fn start(&mut self) {
        self.run = Some(self.sequencer.run(self.params()));
    }

    pub fn button_label(&self) -> &'static str {
        match self.sequencer.phase() {
            Phase::Idle => "Run Simulation",
            Phase::Running => "Restart",
            Phase::Completed => "Run Again",
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.hide(),
            KeyCode::Enter => self.start(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    SimulatorFocus::Amount => SimulatorFocus::Currency,
                    SimulatorFocus::Currency => SimulatorFocus::Amount,
                };
            }
            KeyCode::Up => self.currency = self.currency.prev(),
            KeyCode::Down => self.currency = self.currency.next(),
            key => match self.focus {
                SimulatorFocus::Amount => {
                    self.amount.handle_key(key);
                }
                SimulatorFocus::Currency => match key {
                    KeyCode::Left | KeyCode::Char('h') => self.currency = self.currency.prev(),
                    KeyCode::Right | KeyCode::Char('l') => self.currency = self.currency.next(),
                    _ => {}
                },
            },
        }
    }

    /// Drain run events; returns the summary once when a run completes
    pub fn poll(&mut self) -> Option<Summary> {
        let handle = self.run.as_mut()?;
        loop {
            match handle.events.try_recv() {
                Ok(SequencerEvent::Completed(summary)) => {
                    self.run = None;
                    return Some(summary);
                }
                Ok(SequencerEvent::StepCompleted { .. }) => continue,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.run = None;
                    return None;
                }
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" ✦ Simulate Remittance Flow ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let snapshot = self.sequencer.snapshot();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Description
                Constraint::Length(3), // Inputs
                Constraint::Min(6),    // Preview / progress / completion
                Constraint::Length(1), // Instructions
            ])
            .margin(1)
            .split(inner);

        let description = Paragraph::new(Line::from(vec![Span::styled(
            format!(
                "Test the complete USD → {} payment journey with real-time flow visualization",
                self.currency
            ),
            Style::default().fg(Color::Gray),
        )]));
        frame.render_widget(description, chunks[0]);

        self.render_inputs(frame, chunks[1]);

        match snapshot.phase {
            Phase::Idle => self.render_preview(frame, chunks[2]),
            Phase::Running => self.render_progress(frame, chunks[2], &snapshot),
            Phase::Completed => self.render_completion(frame, chunks[2], &snapshot),
        }

        let instructions = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {}  ", self.button_label())),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" switch field  "),
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" currency  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" close"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[3],
        );
    }

    fn render_inputs(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let focus_style = |focused: bool| {
            if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            }
        };

        let amount_focused = self.focus == SimulatorFocus::Amount;
        let amount = Paragraph::new(self.amount.value()).block(
            Block::default()
                .title(" Amount (USD) ")
                .borders(Borders::ALL)
                .border_style(focus_style(amount_focused)),
        );
        frame.render_widget(amount, cols[0]);

        if amount_focused {
            let input_inner = Block::default().borders(Borders::ALL).inner(cols[0]);
            frame.set_cursor_position((
                input_inner.x + self.amount.cursor_pos() as u16,
                input_inner.y,
            ));
        }

        let currency = Paragraph::new(Line::from(vec![
            Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.currency.code(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" - {}", self.currency.display_name())),
            Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .title(" Destination Currency ")
                .borders(Borders::ALL)
                .border_style(focus_style(self.focus == SimulatorFocus::Currency)),
        );
        frame.render_widget(currency, cols[1]);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let params = self.params();
        let lines = vec![
            Line::from(vec![
                Span::styled("You send        ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("${} USD", format_amount(params.amount)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Recipient gets  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!(
                        "{} {}",
                        format_amount(self.preview_converted()),
                        params.currency
                    ),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Processing fee  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("${:.2}", FLAT_FEE_USD),
                    Style::default().fg(Color::Green),
                ),
            ]),
        ];

        let preview = Paragraph::new(lines).block(
            Block::default()
                .title(" Conversion Preview ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(preview, area);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, snapshot: &RunSnapshot) {
        let block = Block::default()
            .title(" ● Processing simulation... ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let lines: Vec<Line> = snapshot
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let p = status_presentation(snapshot.step_status(i));
                Line::from(vec![
                    Span::styled(format!("{} ", p.glyph), Style::default().fg(p.color)),
                    Span::styled(step.label.clone(), Style::default().fg(p.color)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(snapshot.progress_ratio().clamp(0.0, 1.0))
            .label(format!(
                "{}/{} ({}%)",
                snapshot.current_index,
                snapshot.steps.len(),
                snapshot.percent()
            ));
        frame.render_widget(gauge, rows[1]);
    }

    fn render_completion(&self, frame: &mut Frame, area: Rect, snapshot: &RunSnapshot) {
        let Some(summary) = snapshot.summary.as_ref() else {
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                "✓ Simulation Complete!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "${} USD → {} {}",
                format_amount(summary.amount_usd),
                format_amount(summary.converted_amount),
                summary.currency
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Processing Time: ", Style::default().fg(Color::Green)),
                Span::raw(format!("{:.1}s", summary.actual_elapsed.as_secs_f64())),
                Span::raw("   "),
                Span::styled("Fee: ", Style::default().fg(Color::Green)),
                Span::raw(format!("${:.2}", summary.fee_usd)),
            ]),
        ];

        let completion = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(completion, area);
    }
}
