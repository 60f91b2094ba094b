//! Boxplot geometry.
//!
//! Computes nearest-rank quartiles per group and lays them out on a fixed
//! canvas. The output is a list of plain [`Shape`]s in canvas coordinates
//! (y grows downwards); stroke, fill and fonts are left to the renderer.

use super::partition::Partition;
use serde::Serialize;

/// Widest box, in canvas units.
const MAX_BOX_WIDTH: f64 = 60.0;
/// Share of a group slot taken by its box.
const BOX_WIDTH_RATIO: f64 = 0.6;
/// Half-width of the whisker caps.
const CAP_HALF_WIDTH: f64 = 12.0;
/// Number of intervals on the value axis.
const TICK_INTERVALS: usize = 5;
/// Offset of the group labels below the plot area.
const LABEL_OFFSET: f64 = 16.0;
/// Overhang of the grid lines into the left margin.
const GRID_OVERHANG: f64 = 6.0;
/// Left edge of the tick labels.
const TICK_LABEL_X: f64 = 8.0;
/// Baseline shift of the tick labels relative to their grid line.
const TICK_LABEL_BASELINE: f64 = 4.0;
/// Boxes never collapse below this height.
const MIN_BOX_HEIGHT: f64 = 1.0;

/// Five-number summary using nearest-rank order statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Quartiles {
    /// Quartiles of `values`, picking `sorted[floor((n - 1) * p)]` for each
    /// `p` in 0.25, 0.5 and 0.75. `None` when no finite value is present.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let last = sorted.len() - 1;
        let rank = |p: f64| sorted[(last as f64 * p).floor() as usize];

        Some(Self {
            min: sorted[0],
            q1: rank(0.25),
            median: rank(0.5),
            q3: rank(0.75),
            max: sorted[last],
        })
    }
}

/// Canvas size and margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotDimensions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl PlotDimensions {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

impl Default for PlotDimensions {
    fn default() -> Self {
        Self::new(800.0, 350.0, 40.0)
    }
}

/// Inverted affine map from data values to canvas y coordinates.
///
/// `min` lands on the bottom edge of the plot area and `max` on the top
/// edge. When `min == max` every value maps to the vertical midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    dims: PlotDimensions,
}

impl ValueScale {
    pub fn new(min: f64, max: f64, dims: PlotDimensions) -> Self {
        Self { min, max, dims }
    }

    /// Scale spanning the finite values of `values`, or `None` if there are none.
    pub fn from_values<I>(values: I, dims: PlotDimensions) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<(f64, f64)>, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new(min, max, dims))
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Canvas y coordinate of `value`.
    pub fn project(&self, value: f64) -> f64 {
        let top = self.dims.padding;
        let span = self.dims.inner_height();
        if self.is_degenerate() {
            return top + span / 2.0;
        }
        top + (1.0 - (value - self.min) / (self.max - self.min)) * span
    }
}

/// Text alignment of a [`Shape::Label`] relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
}

/// One drawing primitive in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Label {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
    },
}

/// A value-axis tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

/// Box, median and whisker coordinates for one non-empty group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxGlyph {
    pub quartiles: Quartiles,
    pub left: f64,
    pub right: f64,
    /// y of the third quartile.
    pub box_top: f64,
    /// y of the first quartile.
    pub box_bottom: f64,
    pub median_y: f64,
    /// y of the largest value.
    pub whisker_top: f64,
    /// y of the smallest value.
    pub whisker_bottom: f64,
    pub cap_left: f64,
    pub cap_right: f64,
}

impl BoxGlyph {
    /// Drawn height of the box, never below one unit.
    pub fn box_height(&self) -> f64 {
        (self.box_bottom - self.box_top).max(MIN_BOX_HEIGHT)
    }
}

/// Layout slot of one group. Empty groups keep their slot and label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBox {
    pub name: String,
    pub center_x: f64,
    pub label_y: f64,
    pub glyph: Option<BoxGlyph>,
}

/// Complete boxplot layout for a partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotGeometry {
    pub dimensions: PlotDimensions,
    /// `None` when no group holds a finite value.
    pub scale: Option<ValueScale>,
    pub ticks: Vec<Tick>,
    pub groups: Vec<GroupBox>,
    pub shapes: Vec<Shape>,
}

impl BoxplotGeometry {
    /// Lay out one box per group, left to right in partition order.
    pub fn build(partition: &Partition, dims: PlotDimensions) -> Self {
        let scale = ValueScale::from_values(partition.all_values(), dims);
        let ticks = scale.map(|s| axis_ticks(&s)).unwrap_or_default();

        let slots = partition.len().max(1) as f64;
        let step = dims.inner_width() / slots;
        let box_width = MAX_BOX_WIDTH.min(step * BOX_WIDTH_RATIO);
        let label_y = dims.height - dims.padding + LABEL_OFFSET;

        let groups: Vec<GroupBox> = partition
            .groups()
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let center_x = dims.padding + idx as f64 * step + step / 2.0;
                let glyph = scale.and_then(|s| {
                    Quartiles::from_values(&group.values).map(|q| BoxGlyph {
                        quartiles: q,
                        left: center_x - box_width / 2.0,
                        right: center_x + box_width / 2.0,
                        box_top: s.project(q.q3),
                        box_bottom: s.project(q.q1),
                        median_y: s.project(q.median),
                        whisker_top: s.project(q.max),
                        whisker_bottom: s.project(q.min),
                        cap_left: center_x - CAP_HALF_WIDTH,
                        cap_right: center_x + CAP_HALF_WIDTH,
                    })
                });
                GroupBox {
                    name: group.name.clone(),
                    center_x,
                    label_y,
                    glyph,
                }
            })
            .collect();

        let shapes = draw(&dims, &ticks, &groups);

        Self {
            dimensions: dims,
            scale,
            ticks,
            groups,
            shapes,
        }
    }
}

fn axis_ticks(scale: &ValueScale) -> Vec<Tick> {
    (0..=TICK_INTERVALS)
        .map(|t| {
            let value = scale.min + (t as f64 / TICK_INTERVALS as f64) * (scale.max - scale.min);
            Tick {
                value,
                y: scale.project(value),
            }
        })
        .collect()
}

fn draw(dims: &PlotDimensions, ticks: &[Tick], groups: &[GroupBox]) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(ticks.len() * 2 + groups.len() * 6);

    for tick in ticks {
        shapes.push(Shape::Line {
            x1: dims.padding - GRID_OVERHANG,
            y1: tick.y,
            x2: dims.width - dims.padding,
            y2: tick.y,
        });
        shapes.push(Shape::Label {
            x: TICK_LABEL_X,
            y: tick.y + TICK_LABEL_BASELINE,
            text: tick_text(tick.value),
            anchor: TextAnchor::Start,
        });
    }

    for group in groups {
        if let Some(g) = &group.glyph {
            // Whisker
            shapes.push(Shape::Line {
                x1: group.center_x,
                y1: g.whisker_bottom,
                x2: group.center_x,
                y2: g.whisker_top,
            });
            shapes.push(Shape::Rect {
                x: g.left,
                y: g.box_top,
                width: g.right - g.left,
                height: g.box_height(),
            });
            // Median
            shapes.push(Shape::Line {
                x1: g.left,
                y1: g.median_y,
                x2: g.right,
                y2: g.median_y,
            });
            for y in [g.whisker_bottom, g.whisker_top] {
                shapes.push(Shape::Line {
                    x1: g.cap_left,
                    y1: y,
                    x2: g.cap_right,
                    y2: y,
                });
            }
        }
        shapes.push(Shape::Label {
            x: group.center_x,
            y: group.label_y,
            text: group.name.clone(),
            anchor: TextAnchor::Middle,
        });
    }

    shapes
}

/// Tick values are shown with at most three decimals and no trailing zeros.
fn tick_text(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid printing "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}
