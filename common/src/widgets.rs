//! The dashboard's widget model.
//!
//! [`WidgetSet`] is everything the pipeline may do to the screen. The
//! in-memory [`DashboardWidgets`] implements it and is what the sensor side
//! writes and the render side mirrors into the real UI.

use std::collections::VecDeque;

/// The two radial gauges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GaugeId {
    Temperature,
    Humidity,
}

/// The two value labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelId {
    Temperature,
    Humidity,
}

/// Setter operations of the widget tree.
pub trait WidgetSet {
    fn set_gauge_value(&mut self, gauge: GaugeId, value: i32);
    fn set_gauge_clickable(&mut self, gauge: GaugeId, clickable: bool);
    fn set_label_text(&mut self, label: LabelId, text: &str);
    fn append_chart(&mut self, temperature: f32, humidity: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaugeState {
    pub value: i32,
    pub clickable: bool,
}

impl Default for GaugeState {
    fn default() -> Self {
        // freshly created gauges accept input until reset says otherwise
        Self {
            value: 0,
            clickable: true,
        }
    }
}

/// What the gauges and labels currently show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub temperature_gauge: GaugeState,
    pub humidity_gauge: GaugeState,
    pub temperature_label: String,
    pub humidity_label: String,
}

impl DisplayState {
    pub fn gauge(&self, gauge: GaugeId) -> &GaugeState {
        match gauge {
            GaugeId::Temperature => &self.temperature_gauge,
            GaugeId::Humidity => &self.humidity_gauge,
        }
    }

    fn gauge_mut(&mut self, gauge: GaugeId) -> &mut GaugeState {
        match gauge {
            GaugeId::Temperature => &mut self.temperature_gauge,
            GaugeId::Humidity => &mut self.humidity_gauge,
        }
    }

    pub fn label(&self, label: LabelId) -> &str {
        match label {
            LabelId::Temperature => &self.temperature_label,
            LabelId::Humidity => &self.humidity_label,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub temperature: f32,
    pub humidity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Series {
    Temperature,
    Humidity,
}

/// Fixed-size point history of the chart. New points push out the oldest.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartHistory {
    capacity: usize,
    points: VecDeque<ChartPoint>,
}

impl ChartHistory {
    /// Both series are drawn against this value range.
    pub const RANGE: (f32, f32) = (0.0, 100.0);

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: ChartPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    /// SVG path commands for one series in a 100x100 view box.
    ///
    /// Points are laid out on `capacity` equally spaced slots, newest on the
    /// right. Values outside [`Self::RANGE`] are pinned to the edges.
    pub fn path_commands(&self, series: Series) -> String {
        use std::fmt::Write;

        let (low, high) = Self::RANGE;
        let step = if self.capacity > 1 {
            100.0 / (self.capacity - 1) as f32
        } else {
            0.0
        };
        let offset = self.capacity - self.points.len();

        let mut commands = String::new();
        for (i, point) in self.points.iter().enumerate() {
            let value = match series {
                Series::Temperature => point.temperature,
                Series::Humidity => point.humidity,
            };
            let x = (offset + i) as f32 * step;
            let y = 100.0 - ((value - low) / (high - low)).clamp(0.0, 1.0) * 100.0;
            let verb = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                commands.push(' ');
            }
            let _ = write!(commands, "{verb} {x:.1} {y:.1}");
        }
        commands
    }
}

/// In-memory widget tree.
///
/// Every mutation bumps a revision counter so observers can tell whether
/// anything happened since they last looked.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardWidgets {
    state: DisplayState,
    chart: ChartHistory,
    revision: u64,
}

impl DashboardWidgets {
    pub fn new(chart_points: usize) -> Self {
        Self {
            state: DisplayState::default(),
            chart: ChartHistory::new(chart_points),
            revision: 0,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn chart(&self) -> &ChartHistory {
        &self.chart
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl WidgetSet for DashboardWidgets {
    fn set_gauge_value(&mut self, gauge: GaugeId, value: i32) {
        self.state.gauge_mut(gauge).value = value;
        self.touch();
    }

    fn set_gauge_clickable(&mut self, gauge: GaugeId, clickable: bool) {
        self.state.gauge_mut(gauge).clickable = clickable;
        self.touch();
    }

    fn set_label_text(&mut self, label: LabelId, text: &str) {
        let target = match label {
            LabelId::Temperature => &mut self.state.temperature_label,
            LabelId::Humidity => &mut self.state.humidity_label,
        };
        target.clear();
        target.push_str(text);
        self.touch();
    }

    fn append_chart(&mut self, temperature: f32, humidity: f32) {
        self.chart.push(ChartPoint {
            temperature,
            humidity,
        });
        self.touch();
    }
}
