//! GameView: maps an [`Observation`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It only reads the observation, so the same
//! frame comes out for the same observation, mode and viewport.

use crate::env::Observation;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::PieceKind;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Which screen to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Title and controls, before the first game.
    Start,
    /// Board, falling piece and side panel.
    Playing,
    /// Final board with the result overlaid.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const CONTROLS: [&str; 5] = [
    "A/D or \u{2190}/\u{2192}  move",
    "W or \u{2191}      rotate",
    "S or \u{2193}      soft drop",
    "Space       hard drop",
    "R restart   Q quit",
];

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Top-left corner and outer size of the bordered play field.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into a fresh framebuffer.
    pub fn render(&self, obs: &Observation, mode: RenderMode, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(obs, mode, viewport, &mut fb);
        fb
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is only resized
    /// when the viewport changes.
    pub fn render_into(
        &self,
        obs: &Observation,
        mode: RenderMode,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        match mode {
            RenderMode::Start => self.draw_start_screen(fb, viewport),
            RenderMode::Playing => {
                let frame = self.draw_board(fb, obs, viewport, true);
                self.draw_side_panel(fb, obs, viewport, frame);
            }
            RenderMode::GameOver => {
                let frame = self.draw_board(fb, obs, viewport, false);
                self.draw_side_panel(fb, obs, viewport, frame);
                self.draw_game_over(fb, obs, frame);
            }
        }
    }

    fn frame_for(&self, obs: &Observation, viewport: Viewport) -> Frame {
        let w = (obs.width() as u16).saturating_mul(self.cell_w).saturating_add(2);
        let h = (obs.height() as u16).saturating_mul(self.cell_h).saturating_add(2);
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    fn draw_board(
        &self,
        fb: &mut FrameBuffer,
        obs: &Observation,
        viewport: Viewport,
        with_active: bool,
    ) -> Frame {
        let frame = self.frame_for(obs, viewport);

        fb.fill_rect(
            frame.x.saturating_add(1),
            frame.y.saturating_add(1),
            frame.w.saturating_sub(2),
            frame.h.saturating_sub(2),
            ' ',
            CellStyle::plain(Rgb::new(80, 80, 90), PLAY_BG),
        );
        draw_border(fb, frame, CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG));

        let empty = CellStyle::plain(Rgb::new(90, 90, 100), PLAY_BG).dim();
        for (y, row) in obs.grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                match PieceKind::from_code(code) {
                    Some(kind) => {
                        self.fill_cell(fb, frame, x as u16, y as u16, '█', piece_style(kind))
                    }
                    None => self.fill_cell(fb, frame, x as u16, y as u16, '·', empty),
                }
            }
        }

        if with_active {
            if let Some(active) = obs.active_piece {
                let style = piece_style(active.shape);
                for (x, y) in active.cells() {
                    if x >= 0 && y >= 0 && (x as usize) < obs.width() && (y as usize) < obs.height() {
                        self.fill_cell(fb, frame, x as u16, y as u16, '█', style);
                    }
                }
            }
        }

        frame
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = frame.x.saturating_add(1).saturating_add(x.saturating_mul(self.cell_w));
        let py = frame.y.saturating_add(1).saturating_add(y.saturating_mul(self.cell_h));
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, obs: &Observation, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 8 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, v) in [
            ("SCORE", obs.score),
            ("LEVEL", obs.level),
            ("LINES", obs.lines_cleared),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        for kind in obs.next_pieces.iter() {
            y = y.saturating_add(1);
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, piece_letter(*kind), piece_style(*kind));
        }
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, obs: &Observation, frame: Frame) {
        let style = CellStyle::plain(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let mid_y = frame.y.saturating_add(frame.h / 2);

        centered(fb, frame.x, frame.w, mid_y.saturating_sub(1), "GAME OVER", style);

        let score = format!("SCORE {}", obs.score);
        centered(fb, frame.x, frame.w, mid_y.saturating_add(1), &score, style);
        centered(fb, frame.x, frame.w, mid_y.saturating_add(3), "R restart  Q quit", style);
    }

    fn draw_start_screen(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        let box_w: u16 = 32;
        let box_h: u16 = 8 + CONTROLS.len() as u16;
        let frame = Frame {
            x: viewport.width.saturating_sub(box_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(box_h) / 2,
                AnchorY::Top => 0,
            },
            w: box_w,
            h: box_h,
        };
        draw_border(fb, frame, CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG));

        let title = CellStyle::plain(Rgb::new(80, 220, 220), SCREEN_BG).bold();
        let text = CellStyle::default();
        let hint = text.dim();

        centered(fb, frame.x, frame.w, frame.y + 1, "T E T R I S", title);
        centered(fb, frame.x, frame.w, frame.y + 3, "Press ENTER to start", text);
        centered(fb, frame.x, frame.w, frame.y + 4, "Press Q to quit", text);

        for (i, line) in CONTROLS.iter().enumerate() {
            fb.put_str(frame.x + 3, frame.y + 6 + i as u16, line, hint);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn centered(fb: &mut FrameBuffer, x: u16, w: u16, y: u16, text: &str, style: CellStyle) {
    let text_w = text.chars().count() as u16;
    fb.put_str(x.saturating_add(w.saturating_sub(text_w) / 2), y, text, style);
}

fn piece_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::I => "I",
        PieceKind::O => "O",
        PieceKind::T => "T",
        PieceKind::S => "S",
        PieceKind::Z => "Z",
        PieceKind::J => "J",
        PieceKind::L => "L",
    }
}

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::plain(fg, PLAY_BG).bold()
}
