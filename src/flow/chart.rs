//! Illustrative transaction flow chart shown on the overview.
//!
//! Nodes are static sample data (one transfer frozen mid-flight). Status and
//! accent are closed tag sets so every renderer match is exhaustive.

use super::StepStatus;

/// Accent colour of a chart node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Green,
    Blue,
    Orange,
    Purple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StepStatus,
    /// Observed stage time, only known once a stage has started
    pub time: Option<&'static str>,
    pub accent: Accent,
    pub description: &'static str,
}

/// Approximate end-to-end time shown in the chart legend
pub const CHART_TOTAL_TIME: &str = "~2.3s";

/// The sample journey rendered by the flow chart
pub fn sample_flow() -> Vec<FlowNode> {
    vec![
        FlowNode {
            id: "fiat-input",
            label: "Carlos: Fiat Input",
            status: StepStatus::Completed,
            time: Some("0.1s"),
            accent: Accent::Green,
            description: "USD $100 via Circle ACH on-ramp",
        },
        FlowNode {
            id: "rust-router",
            label: "Rust Security Router",
            status: StepStatus::Completed,
            time: Some("0.2s"),
            accent: Accent::Blue,
            description: "Rust-secured validation & routing engine",
        },
        FlowNode {
            id: "polygon",
            label: "Polygon Transfer",
            status: StepStatus::Pending,
            time: Some("2.0s"),
            accent: Accent::Blue,
            description: "Sub-second USDC transfer on Polygon",
        },
        FlowNode {
            id: "micropay",
            label: "x402 Micropay Split",
            status: StepStatus::Waiting,
            time: None,
            accent: Accent::Blue,
            description: "Micropayment processing & splits",
        },
        FlowNode {
            id: "offramp",
            label: "Yellow Card Off-ramp",
            status: StepStatus::Waiting,
            time: None,
            accent: Accent::Green,
            description: "Compliant NGN conversion",
        },
        FlowNode {
            id: "payout",
            label: "Chinedu: Bank Payout",
            status: StepStatus::Waiting,
            time: None,
            accent: Accent::Green,
            description: "Final delivery to mobile wallet/bank",
        },
        FlowNode {
            id: "rewards",
            label: "$HYPE Rewards",
            status: StepStatus::Waiting,
            time: None,
            accent: Accent::Orange,
            description: "Loyalty rewards webhook trigger",
        },
    ]
}

/// Flow chart with an optional selected node
#[derive(Debug, Clone)]
pub struct FlowChart {
    pub nodes: Vec<FlowNode>,
    selected: Option<usize>,
}

impl FlowChart {
    pub fn new(nodes: Vec<FlowNode>) -> Self {
        Self {
            nodes,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&FlowNode> {
        self.selected.and_then(|i| self.nodes.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.nodes.len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1) % len));
    }

    pub fn select_prev(&mut self) {
        let len = self.nodes.len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(len - 1, |i| {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }));
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Count of nodes per status, in (completed, pending, waiting) order
    pub fn status_counts(&self) -> (usize, usize, usize) {
        self.nodes
            .iter()
            .fold((0, 0, 0), |(c, p, w), node| match node.status {
                StepStatus::Completed => (c + 1, p, w),
                StepStatus::Pending => (c, p + 1, w),
                StepStatus::Waiting => (c, p, w + 1),
            })
    }
}

impl Default for FlowChart {
    fn default() -> Self {
        Self::new(sample_flow())
    }
}
