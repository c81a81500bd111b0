use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::WordId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stroke {
    pub id: u32,
    pub points: Vec<StrokePoint>,
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrawingSnapshot {
    pub word_id: WordId,
    pub strokes: Vec<Stroke>,
    pub completed: bool,
}
