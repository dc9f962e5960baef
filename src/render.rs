//! Overlay rendering of tracked players onto video frames.

use image::Rgb;
use imageproc::drawing::draw_line_segment_mut;

use crate::store::{Category, TrackStore};
use crate::{Error, Frame, Result};

/// Angular step between consecutive polyline segments of the marker arc.
const ARC_STEP_DEG: f32 = 4.0;

/// Visual parameters for the player foot marker.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub player_color: Rgb<u8>,
    /// Stroke thickness in pixels
    pub thickness: u32,
    /// Vertical semi-axis as a fraction of the horizontal one
    pub vertical_ratio: f32,
    /// Arc sweep in degrees; the uncovered span leaves the marker open
    pub arc_start_deg: f32,
    pub arc_end_deg: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            player_color: Rgb([255, 0, 0]),
            thickness: 2,
            vertical_ratio: 0.35,
            arc_start_deg: -45.0,
            arc_end_deg: 235.0,
        }
    }
}

/// Draws per-frame track overlays without touching the input frames.
///
/// Only the `players` mapping is rendered; referees and ball entries stay in
/// the store undrawn. Each player gets a partial open ellipse anchored at the
/// bottom center of its bounding box, visually marking ground contact without
/// occluding the player above.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    style: RenderStyle,
}

impl OverlayRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render one annotated copy per input frame, in input order.
    ///
    /// The store must cover exactly the supplied clip; a length disagreement
    /// is [`Error::FrameCountMismatch`]. Inputs are never mutated.
    pub fn render(&self, frames: &[Frame], store: &TrackStore) -> Result<Vec<Frame>> {
        if frames.len() != store.frame_count() {
            return Err(Error::FrameCountMismatch {
                frames: frames.len(),
                tracked: store.frame_count(),
            });
        }

        let mut output = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let mut canvas = frame.clone();
            if let Some(players) = store.frame(Category::Player, index) {
                for entry in players.values() {
                    self.draw_foot_marker(&mut canvas, &entry.bbox);
                }
            }
            output.push(canvas);
        }
        Ok(output)
    }

    /// Open ellipse at the bottom center of the box: horizontal semi-axis =
    /// box width, vertical semi-axis = `vertical_ratio` of that.
    fn draw_foot_marker(&self, canvas: &mut Frame, bbox: &[f32; 4]) {
        let center_x = (bbox[0] + bbox[2]) / 2.0;
        let bottom_y = bbox[3];
        let width = bbox[2] - bbox[0];

        for offset in 0..self.style.thickness {
            let rx = width - offset as f32;
            let ry = self.style.vertical_ratio * width - offset as f32;
            if rx <= 0.0 || ry <= 0.0 {
                break;
            }
            draw_arc(
                canvas,
                (center_x, bottom_y),
                rx,
                ry,
                self.style.arc_start_deg,
                self.style.arc_end_deg,
                self.style.player_color,
            );
        }
    }
}

/// Draw an elliptical arc as a polyline of short segments.
fn draw_arc(
    canvas: &mut Frame,
    center: (f32, f32),
    rx: f32,
    ry: f32,
    start_deg: f32,
    end_deg: f32,
    color: Rgb<u8>,
) {
    let sweep = end_deg - start_deg;
    let steps = ((sweep / ARC_STEP_DEG).abs().ceil() as u32).max(1);

    let mut previous = arc_point(center, rx, ry, start_deg);
    for step in 1..=steps {
        let angle = start_deg + sweep * step as f32 / steps as f32;
        let next = arc_point(center, rx, ry, angle);
        draw_line_segment_mut(canvas, previous, next, color);
        previous = next;
    }
}

fn arc_point(center: (f32, f32), rx: f32, ry: f32, angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg.to_radians();
    (center.0 + rx * rad.cos(), center.1 + ry * rad.sin())
}
