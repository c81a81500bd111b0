use doodle_types::{DrawingSnapshot, Stroke, StrokePoint, WordId};

use crate::{EngineError, EngineResult};

pub const DEFAULT_BRUSH_COLOR: &str = "#FF6B6B";
pub const DEFAULT_BRUSH_SIZE: u32 = 4;

/// The canvas collaborator. The engine only starts, completes and discards
/// drawings and forwards undo/clear requests; stroke capture lives elsewhere.
pub trait DrawingSurface: Send {
    fn start(&mut self, word_id: WordId);
    fn add_stroke(
        &mut self,
        points: Vec<StrokePoint>,
        color: Option<String>,
        size: Option<u32>,
    ) -> EngineResult<DrawingSnapshot>;
    fn undo(&mut self) -> EngineResult<DrawingSnapshot>;
    fn clear(&mut self) -> EngineResult<DrawingSnapshot>;
    fn complete(&mut self) -> EngineResult<DrawingSnapshot>;
    fn discard(&mut self);
    fn snapshot(&self) -> Option<DrawingSnapshot>;
}

/// In-memory stroke list
#[derive(Debug, Default)]
pub struct Sketchpad {
    current: Option<DrawingSnapshot>,
    next_stroke_id: u32,
}

impl Sketchpad {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_drawing(&mut self) -> EngineResult<&mut DrawingSnapshot> {
        match self.current.as_mut() {
            Some(drawing) if !drawing.completed => Ok(drawing),
            _ => Err(EngineError::NoActiveRound),
        }
    }
}

impl DrawingSurface for Sketchpad {
    fn start(&mut self, word_id: WordId) {
        self.current = Some(DrawingSnapshot {
            word_id,
            strokes: Vec::new(),
            completed: false,
        });
    }

    fn add_stroke(
        &mut self,
        points: Vec<StrokePoint>,
        color: Option<String>,
        size: Option<u32>,
    ) -> EngineResult<DrawingSnapshot> {
        let id = self.next_stroke_id;
        let drawing = self.live_drawing()?;
        drawing.strokes.push(Stroke {
            id,
            points,
            color: color.unwrap_or_else(|| DEFAULT_BRUSH_COLOR.to_string()),
            size: size.unwrap_or(DEFAULT_BRUSH_SIZE),
        });
        let snapshot = drawing.clone();
        self.next_stroke_id += 1;
        Ok(snapshot)
    }

    fn undo(&mut self) -> EngineResult<DrawingSnapshot> {
        let drawing = self.live_drawing()?;
        drawing.strokes.pop();
        Ok(drawing.clone())
    }

    fn clear(&mut self) -> EngineResult<DrawingSnapshot> {
        let drawing = self.live_drawing()?;
        drawing.strokes.clear();
        Ok(drawing.clone())
    }

    fn complete(&mut self) -> EngineResult<DrawingSnapshot> {
        let drawing = self.live_drawing()?;
        drawing.completed = true;
        Ok(drawing.clone())
    }

    fn discard(&mut self) {
        self.current = None;
    }

    fn snapshot(&self) -> Option<DrawingSnapshot> {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<StrokePoint> {
        vec![StrokePoint { x: 0.0, y: 0.0 }, StrokePoint { x: 10.0, y: 5.0 }]
    }

    #[test]
    fn test_undo_and_clear() {
        let mut pad = Sketchpad::new();
        pad.start(7);

        pad.add_stroke(line(), None, None).unwrap();
        let drawing = pad.add_stroke(line(), Some("#000000".to_string()), Some(8)).unwrap();
        assert_eq!(drawing.strokes.len(), 2);
        assert_eq!(drawing.strokes[0].color, DEFAULT_BRUSH_COLOR);
        assert_eq!(drawing.strokes[0].size, DEFAULT_BRUSH_SIZE);
        assert_eq!(drawing.strokes[1].size, 8);
        assert_ne!(drawing.strokes[0].id, drawing.strokes[1].id);

        assert_eq!(pad.undo().unwrap().strokes.len(), 1);
        assert!(pad.clear().unwrap().strokes.is_empty());

        // Undo on an empty canvas is a no-op
        assert!(pad.undo().unwrap().strokes.is_empty());
    }

    #[test]
    fn test_no_drawing_means_no_active_round() {
        let mut pad = Sketchpad::new();
        assert_eq!(pad.undo(), Err(EngineError::NoActiveRound));
        assert_eq!(pad.clear(), Err(EngineError::NoActiveRound));
        assert_eq!(pad.complete(), Err(EngineError::NoActiveRound));
        assert!(pad.add_stroke(line(), None, None).is_err());
        assert!(pad.snapshot().is_none());
    }

    #[test]
    fn test_completed_drawing_is_frozen() {
        let mut pad = Sketchpad::new();
        pad.start(1);
        pad.add_stroke(line(), None, None).unwrap();

        let done = pad.complete().unwrap();
        assert!(done.completed);
        assert_eq!(pad.undo(), Err(EngineError::NoActiveRound));
        assert_eq!(pad.snapshot().unwrap().strokes.len(), 1);

        pad.discard();
        assert!(pad.snapshot().is_none());
    }
}
