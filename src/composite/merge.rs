use crate::composite::blend::BlendMode;
use crate::composite::canvas::Canvas;
use crate::foundation::core::PixelBuffer;
use crate::transform::geometry::zoom;

/// Place `bg` at `bg_offset` and `fg` at `fg_offset` on a canvas sized to their bounding box.
///
/// The background is copied as-is; the foreground is composited over it with `mode`, touching
/// only the pixels it covers. An empty layer contributes nothing.
pub fn merge(
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    mode: BlendMode,
    bg_offset: (u32, u32),
    fg_offset: (u32, u32),
) -> PixelBuffer {
    let extent = |buf: &PixelBuffer, (x, y): (u32, u32)| {
        if buf.is_empty() {
            (0, 0)
        } else {
            (x.saturating_add(buf.width()), y.saturating_add(buf.height()))
        }
    };
    let (bw, bh) = extent(bg, bg_offset);
    let (fw, fh) = extent(fg, fg_offset);
    let (width, height) = (bw.max(fw), bh.max(fh));
    if width == 0 || height == 0 {
        return PixelBuffer::empty();
    }

    let mut canvas = Canvas::new(width, height);
    canvas.draw_buffer(
        bg,
        i64::from(bg_offset.0),
        i64::from(bg_offset.1),
        BlendMode::Src,
        255,
    );
    canvas.draw_buffer(fg, i64::from(fg_offset.0), i64::from(fg_offset.1), mode, 255);
    canvas.into_buffer()
}

/// Offsets `(bg_offset, fg_offset)` centering the smaller layer on the larger, per axis.
pub fn centered_offsets(bg: (u32, u32), fg: (u32, u32)) -> ((u32, u32), (u32, u32)) {
    let axis = |b: u32, f: u32| if b > f { (0, (b - f) / 2) } else { ((f - b) / 2, 0) };
    let (bx, fx) = axis(bg.0, fg.0);
    let (by, fy) = axis(bg.1, fg.1);
    ((bx, by), (fx, fy))
}

pub fn merge_centered(bg: &PixelBuffer, fg: &PixelBuffer, mode: BlendMode) -> PixelBuffer {
    let (bg_offset, fg_offset) = centered_offsets(bg.dimensions(), fg.dimensions());
    merge(bg, fg, mode, bg_offset, fg_offset)
}

/// Resize both layers to the smaller of each dimension, then merge them aligned at the origin.
pub fn merge_same_size(bg: &PixelBuffer, fg: &PixelBuffer, mode: BlendMode) -> PixelBuffer {
    let width = bg.width().min(fg.width());
    let height = bg.height().min(fg.height());
    if width == 0 || height == 0 {
        return PixelBuffer::empty();
    }
    merge(
        &zoom(bg, width, height),
        &zoom(fg, width, height),
        mode,
        (0, 0),
        (0, 0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/composite/merge.rs"]
mod tests;
