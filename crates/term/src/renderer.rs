//! Pushes framebuffers to the terminal.
//!
//! The board is redrawn every tick but usually only a handful of cells change
//! (the falling piece, the timer, the momentum bar), so each frame is compared
//! row by row against the last one and only changed spans are re-encoded. Rows
//! that compare equal as a whole are skipped without a per-cell scan.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Double-buffered terminal output
///
/// Generic over the sink so tests can capture the escape stream in a `Vec<u8>`;
/// the binary uses the stdout default.
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    scratch: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Switch the terminal into game mode
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.scratch.clear();
        self.scratch
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush_scratch()
    }

    /// Undo [`enter`](Self::enter); safe to call on an error path
    pub fn exit(&mut self) -> Result<()> {
        self.scratch.clear();
        self.scratch
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush_scratch()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            scratch: Vec::with_capacity(32 * 1024),
        }
    }

    /// Drop the remembered frame so the next draw repaints everything
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Present `fb`, then hand back the previously shown frame in its place
    ///
    /// The caller renders into the returned buffer next tick, so steady-state
    /// drawing never allocates.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.scratch.clear();
        let mut shown = match self.last.take() {
            Some(prev) if same_size(&prev, fb) => {
                encode_diff_into(&prev, fb, &mut self.scratch)?;
                prev
            }
            stale => {
                encode_full_into(fb, &mut self.scratch)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_scratch()?;

        std::mem::swap(&mut shown, fb);
        self.last = Some(shown);
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Queues cells, emitting style escapes only when the style changes
struct StyledCursor<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> StyledCursor<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn cells(&mut self, cells: &[Cell]) -> Result<()> {
        for cell in cells {
            if self.style != Some(cell.style) {
                queue_style(self.out, cell.style)?;
                self.style = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Clear the screen and encode every cell of `fb`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?
        .queue(cursor::MoveTo(0, 0))?;

    let mut pen = StyledCursor::new(out);
    for y in 0..fb.height() {
        if y > 0 {
            pen.out.queue(Print("\r\n"))?;
        }
        pen.cells(fb.row(y))?;
    }
    pen.finish()
}

/// Encode the spans of `next` that differ from `prev`
///
/// Frames of different sizes are encoded row by row in full.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = StyledCursor::new(out);
    for_each_changed_run(prev, next, |x, y, len| {
        pen.out.queue(cursor::MoveTo(x, y))?;
        let row = next.row(y);
        pen.cells(&row[x as usize..(x + len) as usize])
    })?;
    pen.finish()
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(to_color(style.fg)))?
        .queue(SetBackgroundColor(to_color(style.bg)))?
        .queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, len)` for every maximal span of differing cells
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    for y in 0..next.height() {
        let new = next.row(y);
        if !same_size(prev, next) {
            f(0, y, next.width())?;
            continue;
        }
        let old = prev.row(y);
        if old == new {
            continue;
        }

        let mut x = 0;
        while x < new.len() {
            if old[x] == new[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < new.len() && old[x] != new[x] {
                x += 1;
            }
            f(start as u16, y, (x - start) as u16)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn runs_between(a: &FrameBuffer, b: &FrameBuffer) -> Vec<(u16, u16, u16)> {
        let mut runs = Vec::new();
        for_each_changed_run(a, b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        runs
    }

    #[test]
    fn changed_cells_coalesce_into_spans() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        for x in 1..=3 {
            b.put_char(x, 0, 'X', style);
        }
        b.put_char(5, 1, 'Y', style);

        assert_eq!(runs_between(&a, &b), vec![(1, 0, 3), (5, 1, 1)]);
        assert!(runs_between(&b, &b.clone()).is_empty());
    }

    #[test]
    fn size_change_repaints_every_row() {
        let a = FrameBuffer::new(4, 2);
        let b = FrameBuffer::new(3, 3);
        assert_eq!(runs_between(&a, &b), vec![(0, 0, 3), (0, 1, 3), (0, 2, 3)]);
    }

    #[test]
    fn first_draw_is_full_then_diffs() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 0, "ABC", CellStyle::default());
        renderer.draw_swap(&mut fb).unwrap();
        let first = text_of(renderer.writer());
        assert!(first.contains("ABC"));

        // After the swap `fb` holds the blank previous frame.
        fb.put_str(0, 0, "ABC", CellStyle::default());
        fb.put_char(1, 1, 'Z', CellStyle::default());
        renderer.draw_swap(&mut fb).unwrap();
        let second = &text_of(renderer.writer())[first.len()..];
        assert!(second.contains('Z'));
        assert!(!second.contains("ABC"));
    }

    #[test]
    fn unchanged_frame_encodes_no_cells() {
        let fb = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&fb, &fb.clone(), &mut out).unwrap();
        assert!(!text_of(&out).contains(' '));
    }
}
