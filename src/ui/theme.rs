//! Presentation lookup tables for the closed tag sets rendered by the UI.

use ratatui::style::Color;

use crate::flow::chart::Accent;
use crate::flow::StepStatus;
use crate::metrics::CardColor;
use crate::rewards::Tier;
use crate::transactions::TxnStatus;

/// How a step status is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub glyph: &'static str,
    pub color: Color,
    /// Label used in the chart legend
    pub legend: &'static str,
}

const COMPLETED: StatusPresentation = StatusPresentation {
    glyph: "✓",
    color: Color::Green,
    legend: "Completed",
};

const PENDING: StatusPresentation = StatusPresentation {
    glyph: "◷",
    color: Color::Blue,
    legend: "Processing",
};

const WAITING: StatusPresentation = StatusPresentation {
    glyph: "○",
    color: Color::DarkGray,
    legend: "Waiting",
};

pub fn status_presentation(status: StepStatus) -> StatusPresentation {
    match status {
        StepStatus::Completed => COMPLETED,
        StepStatus::Pending => PENDING,
        StepStatus::Waiting => WAITING,
    }
}

/// Legend entries in display order
pub fn status_legend() -> [StatusPresentation; 3] {
    [COMPLETED, PENDING, WAITING]
}

pub fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Green => Color::Green,
        Accent::Blue => Color::Blue,
        Accent::Orange => Color::Yellow,
        Accent::Purple => Color::Magenta,
    }
}

pub fn card_color(color: CardColor) -> Color {
    match color {
        CardColor::Blue => Color::Blue,
        CardColor::Green => Color::Green,
        CardColor::Purple => Color::Magenta,
        CardColor::Orange => Color::Yellow,
    }
}

pub fn txn_status_color(status: TxnStatus) -> Color {
    match status {
        TxnStatus::Completed => Color::Green,
        TxnStatus::Processing => Color::Blue,
        TxnStatus::Failed => Color::Red,
    }
}

pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Gold => Color::Yellow,
        Tier::Silver => Color::Gray,
        Tier::Bronze => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_presentation_distinct() {
        let legend = status_legend();
        assert_eq!(legend[0], status_presentation(StepStatus::Completed));
        assert_eq!(legend[1], status_presentation(StepStatus::Pending));
        assert_eq!(legend[2], status_presentation(StepStatus::Waiting));
        assert_ne!(legend[0].glyph, legend[1].glyph);
        assert_ne!(legend[1].glyph, legend[2].glyph);
    }

    #[test]
    fn test_pending_reads_as_processing() {
        assert_eq!(status_presentation(StepStatus::Pending).legend, "Processing");
    }

    #[test]
    fn test_tier_badges_distinct() {
        assert_ne!(tier_color(Tier::Gold), tier_color(Tier::Silver));
        assert_ne!(tier_color(Tier::Silver), tier_color(Tier::Bronze));
    }
}
