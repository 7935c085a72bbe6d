//! Headline metric cards for the overview.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Blue,
    Green,
    Purple,
    Orange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: &'static str,
    pub change: Option<&'static str>,
    pub trend: Option<Trend>,
    pub subtitle: Option<&'static str>,
    pub color: CardColor,
    /// Shows a live indicator next to the title
    pub live: bool,
}

pub fn overview_metrics() -> Vec<MetricCard> {
    vec![
        MetricCard {
            title: "Volume Today",
            value: "$142,580",
            change: Some("+12.5%"),
            trend: Some(Trend::Up),
            subtitle: None,
            color: CardColor::Blue,
            live: true,
        },
        MetricCard {
            title: "Success Rate",
            value: "99.9%",
            change: Some("+0.2%"),
            trend: Some(Trend::Up),
            subtitle: None,
            color: CardColor::Green,
            live: true,
        },
        MetricCard {
            title: "Fees Saved",
            value: "90%",
            change: None,
            trend: None,
            subtitle: Some("vs. legacy systems"),
            color: CardColor::Purple,
            live: false,
        },
        MetricCard {
            title: "$HYPE Rewards",
            value: "1,247",
            change: Some("+89 today"),
            trend: Some(Trend::Up),
            subtitle: None,
            color: CardColor::Orange,
            live: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_metrics() {
        let cards = overview_metrics();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards.iter().filter(|c| c.live).count(), 2);
        // A change always comes with a trend
        assert!(cards.iter().all(|c| c.change.is_some() == c.trend.is_some()));
    }
}
