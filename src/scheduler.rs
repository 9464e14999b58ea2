//! The asynchronous paint scheduler.
//!
//! Canvas paints are queued instead of run inline and a single budgeted
//! pump (`run_pending`) paints as many as fit in one frame's time budget.
//! The embedder calls `run_pending` on a zero-delay tick whenever it
//! returns a nonzero pending count. Painters that report themselves as
//! animated are re-admitted for the next iteration, which is how progress
//! indicators keep redrawing without a timer of their own.
//!
//! Ordering: the end of the queue is the active end. `push` inserts or
//! bumps there, so the most recently requested paint runs first;
//! `unshift` inserts at the opposite end and only when absent, for
//! background pre-renders. One iteration works on a private snapshot, so
//! a painter re-enqueueing itself cannot starve the rest of the frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::surface::{text_style, Surface};

/// A unit of paint work. Returns `true` to request another animation
/// frame, `false` when the surface is fully rendered.
///
/// A task runs with its painter's lock held and must not call back into
/// that painter's handle; it talks to the world through `surface` only.
pub trait PaintTask: Send {
    fn paint(&mut self, surface: &mut dyn Surface) -> bool;
}

impl<F> PaintTask for F
where
    F: FnMut(&mut dyn Surface) -> bool + Send,
{
    fn paint(&mut self, surface: &mut dyn Surface) -> bool {
        self(surface)
    }
}

/// Scheduling state of one painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintState {
    Idle,
    Queued,
    Running,
    Rendered,
}

struct PainterInner {
    state: PaintState,
    animated: bool,
    paint: Option<Box<dyn PaintTask>>,
    surface: Option<Box<dyn Surface + Send>>,
}

static NEXT_PAINTER_ID: AtomicU64 = AtomicU64::new(1);

/// One canvas's registered paint plus its scheduling state.
///
/// Identity is the explicit `id`, never the allocation address; the queue
/// deduplicates on it.
pub struct AsyncPainter {
    id: u64,
    queue: Arc<RenderQueue>,
    // handle to self for queue insertion; the queue stores strong refs
    weak: Weak<AsyncPainter>,
    inner: Mutex<PainterInner>,
}

impl AsyncPainter {
    /// Registers a painter and immediately enqueues it at background
    /// priority when both a paint and a surface are present.
    pub fn new(
        queue: Arc<RenderQueue>,
        paint: Option<Box<dyn PaintTask>>,
        surface: Option<Box<dyn Surface + Send>>,
    ) -> Arc<Self> {
        let painter = Arc::new_cyclic(|weak| Self {
            id: NEXT_PAINTER_ID.fetch_add(1, Ordering::Relaxed),
            queue,
            weak: weak.clone(),
            inner: Mutex::new(PainterInner {
                state: PaintState::Idle,
                animated: false,
                paint,
                surface,
            }),
        });
        painter.enqueue();
        painter
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> PaintState {
        self.inner.lock().state
    }

    pub fn is_rendered(&self) -> bool {
        self.state() == PaintState::Rendered
    }

    pub fn is_animated(&self) -> bool {
        self.inner.lock().animated
    }

    /// Reads the painted surface, for embedders replaying display lists.
    pub fn with_surface<R>(&self, f: impl FnOnce(&dyn Surface) -> R) -> Option<R> {
        let inner = self.inner.lock();
        inner.surface.as_deref().map(|s| f(s))
    }

    /// Priority request: queue at the active end, bumping if already
    /// queued. A user is waiting on this paint.
    pub fn draw(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state == PaintState::Rendered
                || inner.paint.is_none()
                || inner.surface.is_none()
            {
                return;
            }
            if inner.state == PaintState::Idle {
                inner.state = PaintState::Queued;
                paint_placeholder(inner.surface.as_deref_mut());
            }
        }
        if let Some(me) = self.weak.upgrade() {
            self.queue.push(&me);
        }
    }

    /// Background request: queue at the inactive end, only when idle.
    pub fn enqueue(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state != PaintState::Idle
                || inner.paint.is_none()
                || inner.surface.is_none()
            {
                return;
            }
            inner.state = PaintState::Queued;
            paint_placeholder(inner.surface.as_deref_mut());
        }
        if let Some(me) = self.weak.upgrade() {
            self.queue.unshift(&me);
        }
    }

    /// Paints synchronously, right now. Returns the animated flag.
    pub fn draw_now(&self) -> bool {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        let (Some(paint), Some(surface)) = (inner.paint.as_mut(), inner.surface.as_mut())
        else {
            inner.state = PaintState::Idle;
            inner.animated = false;
            return false;
        };
        inner.state = PaintState::Running;
        surface.clear();
        let animated = paint.paint(surface.as_mut());
        inner.animated = animated;
        inner.state = if animated {
            PaintState::Queued
        } else {
            PaintState::Rendered
        };
        animated
    }

    /// Drops this painter from the queue. Takes effect before the next
    /// iteration; a queued-but-unpainted canvas simply stays unpainted.
    pub fn remove(&self) {
        self.queue.remove_id(self.id);
        let mut inner = self.inner.lock();
        if inner.state != PaintState::Rendered {
            inner.state = PaintState::Idle;
        }
        inner.animated = false;
    }

    /// Swaps in a new paint. This follows user interaction, so the repaint
    /// gets priority.
    pub fn replace_paint(&self, paint: Box<dyn PaintTask>) {
        {
            let mut inner = self.inner.lock();
            inner.paint = Some(paint);
            if inner.state == PaintState::Rendered {
                inner.state = PaintState::Idle;
            }
        }
        self.draw();
    }

    /// Swaps in a new surface. This follows a canvas (re)mount, so it must
    /// not jump ahead of user interaction.
    pub fn replace_surface(&self, surface: Box<dyn Surface + Send>) {
        {
            let mut inner = self.inner.lock();
            inner.surface = Some(surface);
            if inner.state == PaintState::Rendered {
                inner.state = PaintState::Idle;
            }
        }
        self.enqueue();
    }
}

/// Placeholder shown until the real paint runs, so an interrupted canvas
/// still reads as a coherent state.
fn paint_placeholder(surface: Option<&mut (dyn Surface + Send + 'static)>) {
    let Some(surface) = surface else {
        return;
    };
    let h = surface.height();
    let size = (h / 3.0).min(20.0);
    let y = (size + h / 3.0).min(40.0);
    surface.set_font_size(size);
    text_style(&mut *surface);
    surface.draw_text("Rendering...", size, y);
}

pub const DEFAULT_MAX_TIME: Duration = Duration::from_millis(100);

struct QueueState {
    painters: Vec<Arc<AsyncPainter>>,
    max_time: Duration,
    scheduled: bool,
}

/// The global ordered paint queue.
pub struct RenderQueue {
    state: Mutex<QueueState>,
}

impl RenderQueue {
    pub fn new(max_time: Duration) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(QueueState {
                painters: Vec::new(),
                max_time,
                scheduled: false,
            }),
        })
    }

    /// The process-wide queue, constructed on first use.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<RenderQueue>> = OnceLock::new();
        GLOBAL.get_or_init(|| RenderQueue::new(DEFAULT_MAX_TIME)).clone()
    }

    /// Time budget of one `run_pending` iteration. A single paint may
    /// still overrun it; the budget is checked between paints, not inside
    /// them.
    pub fn set_max_time(&self, max_time: Duration) {
        self.state.lock().max_time = max_time;
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().painters.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.state.lock().painters.len()
    }

    /// True when a previous call left work behind and the embedder should
    /// pump again on its next zero-delay tick.
    pub fn needs_pump(&self) -> bool {
        self.state.lock().scheduled
    }

    fn push(&self, painter: &Arc<AsyncPainter>) {
        let mut state = self.state.lock();
        if let Some(idx) = state.painters.iter().position(|p| p.id == painter.id) {
            let p = state.painters.remove(idx);
            state.painters.push(p);
        } else {
            state.painters.push(painter.clone());
        }
        state.scheduled = true;
    }

    fn unshift(&self, painter: &Arc<AsyncPainter>) {
        let mut state = self.state.lock();
        if !state.painters.iter().any(|p| p.id == painter.id) {
            state.painters.insert(0, painter.clone());
        }
        state.scheduled = true;
    }

    fn remove_id(&self, id: u64) {
        let mut state = self.state.lock();
        state.painters.retain(|p| p.id != id);
    }

    /// Runs one budgeted iteration over a snapshot of the queue, painting
    /// from the active end. At least one painter runs per call so the
    /// queue always makes forward progress. Returns the number of painters
    /// still pending.
    pub fn run_pending(&self) -> usize {
        let (mut snapshot, max_time) = {
            let mut state = self.state.lock();
            state.scheduled = false;
            (std::mem::take(&mut state.painters), state.max_time)
        };

        let start = Instant::now();
        let mut painted = 0usize;
        while let Some(painter) = snapshot.pop() {
            if painted > 0 && start.elapsed() >= max_time {
                snapshot.push(painter);
                break;
            }
            let animated = painter.draw_now();
            painted += 1;
            if animated {
                // re-admit for the next iteration, at the active end
                self.readmit(&painter);
            }
        }

        let pending = {
            let mut state = self.state.lock();
            // leftovers keep their relative order below whatever was
            // queued mid-iteration
            let mut merged = Vec::with_capacity(snapshot.len() + state.painters.len());
            for p in snapshot {
                if !state.painters.iter().any(|q| q.id == p.id) {
                    merged.push(p);
                }
            }
            merged.append(&mut state.painters);
            state.painters = merged;
            if !state.painters.is_empty() {
                state.scheduled = true;
            }
            state.painters.len()
        };

        if pending > 0 {
            trace!(painted, pending, "paint budget spent, deferring rest");
        }
        pending
    }

    fn readmit(&self, painter: &Arc<AsyncPainter>) {
        let mut state = self.state.lock();
        if !state.painters.iter().any(|p| p.id == painter.id) {
            state.painters.push(painter.clone());
        }
        state.scheduled = true;
    }

    /// Empties the queue and cancels the pending iteration. Every queued
    /// painter goes back to idle, non-animated. Used when a whole view
    /// unmounts.
    pub fn clear(&self) {
        let painters = {
            let mut state = self.state.lock();
            state.scheduled = false;
            std::mem::take(&mut state.painters)
        };
        for painter in painters {
            let mut inner = painter.inner.lock();
            if inner.state != PaintState::Rendered {
                inner.state = PaintState::Idle;
            }
            inner.animated = false;
        }
    }
}
