use chrono::{Duration, SecondsFormat};
use tracing::{debug, warn};

use crate::models::TimeFrame;
use crate::models::time_layout::parse_timestamp;
use crate::tree::TreeNode;
use crate::{DwmlError, Result};

/// Parser for `time-layout` blocks
pub struct TimeLayoutParser;

impl TimeLayoutParser {
    /// Resolve a `time-layout` node into its key and ordered frames
    pub fn parse(layout: &TreeNode) -> Result<(String, Vec<TimeFrame>)> {
        let key = Self::layout_key(layout)?;
        let frames = Self::time_frames(layout.children())?;
        debug!("Resolved time layout {} with {} frames", key, frames.len());
        Ok((key, frames))
    }

    fn layout_key(layout: &TreeNode) -> Result<String> {
        layout
            .child("layout-key")
            .and_then(TreeNode::content)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                DwmlError::missing_layout_key(format!(
                    "no layout-key in {}",
                    layout.describe()
                ))
            })
    }

    /// Pair start and end markers in document order.
    ///
    /// A start while another frame is open closes that frame at the new
    /// start, so layouts listing only start times still yield contiguous
    /// frames.
    fn time_frames(children: &[TreeNode]) -> Result<Vec<TimeFrame>> {
        children
            .iter()
            .fold(FrameScanner::default(), FrameScanner::accept)
            .finish()
    }
}

#[derive(Default)]
struct FrameScanner {
    frames: Vec<TimeFrame>,
    open_start: Option<String>,
    last_interval: Option<Duration>,
}

impl FrameScanner {
    fn accept(mut self, node: &TreeNode) -> Self {
        let timestamp = node.content().unwrap_or_default();

        match node.name() {
            "start-valid-time" => {
                if let Some(start) = self.open_start.take() {
                    self.close(start, timestamp);
                }
                if !timestamp.is_empty() {
                    self.open_start = Some(timestamp.to_string());
                }
            }
            "end-valid-time" => {
                if let Some(start) = self.open_start.take() {
                    self.close(start, timestamp);
                }
            }
            _ => {}
        }

        self
    }

    fn close(&mut self, start: String, end: &str) {
        let frame = TimeFrame::new(start, end);
        match frame.duration() {
            Ok(interval) => self.last_interval = Some(interval),
            Err(e) => warn!("Cannot measure time frame {} - {}: {}", frame.start, frame.end, e),
        }
        self.frames.push(frame);
    }

    fn finish(mut self) -> Result<Vec<TimeFrame>> {
        if let Some(start) = self.open_start.take() {
            let interval = self.last_interval.unwrap_or_else(|| Duration::hours(1));
            let end = synthesize_end(&start, interval)?;
            debug!("Closing trailing frame {} with synthesized end {}", start, end);
            self.frames.push(TimeFrame::new(start, end));
        }
        Ok(self.frames)
    }
}

/// `start + interval`, written in the start's own UTC offset
fn synthesize_end(start: &str, interval: Duration) -> Result<String> {
    let start_time = parse_timestamp(start)?;
    let use_z = start.trim_end().ends_with(['Z', 'z']);
    // Whole seconds like the document's own timestamps; a fractional part is
    // only written when the start carried one.
    Ok((start_time + interval).to_rfc3339_opts(SecondsFormat::AutoSi, use_z))
}
