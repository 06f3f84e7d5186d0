//! Row scheduling and per-worker scratch.
//
// Every kernel in this crate is a loop over independent rows whose outputs
// land in disjoint regions. `Parallelism` decides how many workers a call
// gets, runs on the current rayon pool when it already has exactly that many
// threads and otherwise on a dedicated pool of that size, and hands out one
// row per work item so that dense rows do not stall a statically assigned
// block. `ScratchArena` holds the lazily allocated per-worker buffers and is
// dropped with the call that created it.

use crate::error::{KernelError, Result};
use log::{debug, trace};
use rayon::prelude::*;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use thread_local::ThreadLocal;

/// Worker-count hint for one kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parallelism {
    nthreads: usize,
}

impl Default for Parallelism {
    /// Follows rayon's global setting, so `RAYON_NUM_THREADS` is honoured.
    fn default() -> Self {
        Self::new(rayon::current_num_threads())
    }
}

impl Parallelism {
    /// A hint of zero is treated as one.
    #[inline]
    #[must_use]
    pub const fn new(nthreads: usize) -> Self {
        Self {
            nthreads: if nthreads == 0 { 1 } else { nthreads },
        }
    }

    #[inline]
    #[must_use]
    pub const fn sequential() -> Self {
        Self { nthreads: 1 }
    }

    #[inline]
    #[must_use]
    pub const fn nthreads(&self) -> usize {
        self.nthreads
    }

    /// Workers actually used for `rows` independent items: never more than
    /// there is work for.
    #[inline]
    #[must_use]
    pub fn workers_for(&self, rows: usize) -> usize {
        self.nthreads.min(rows).max(1)
    }

    fn install<R, OP>(workers: usize, op: OP) -> Result<R>
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        if rayon::current_num_threads() == workers {
            trace!("reusing the current pool of {workers} threads");
            return Ok(op());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("spmx-worker-{idx}"))
            .build()?;
        Ok(pool.install(op))
    }

    /// Run `f(row)` for every row in `0..rows`, stopping at the first error.
    ///
    /// # Errors
    /// [`KernelError::ThreadPool`] if the pool cannot be started, otherwise
    /// the first error returned by `f`.
    pub fn try_for_each_row<F>(&self, rows: usize, f: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Send + Sync,
    {
        if rows == 0 {
            trace!("no rows to schedule");
            return Ok(());
        }
        let workers = self.workers_for(rows);
        if workers == 1 {
            return (0..rows).try_for_each(f);
        }
        debug!("scheduling {rows} rows on {workers} workers");
        Self::install(workers, || {
            (0..rows)
                .into_par_iter()
                .with_max_len(1)
                .try_for_each(&f)
        })?
    }

    /// Split `data` into consecutive chunks of `stride` elements and run
    /// `f(row, chunk)` for the first `rows` of them. The final chunk may be
    /// shorter than `stride` when `data` ends right after the last row.
    ///
    /// # Errors
    /// [`KernelError::ThreadPool`] if the pool cannot be started.
    ///
    /// # Panics
    /// If `stride` is zero.
    pub fn for_each_row_chunk<T, F>(
        &self,
        data: &mut [T],
        stride: usize,
        rows: usize,
        f: F,
    ) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        assert!(stride > 0, "row stride must be positive");
        if rows == 0 {
            trace!("no rows to schedule");
            return Ok(());
        }
        let workers = self.workers_for(rows);
        if workers == 1 {
            data.chunks_mut(stride)
                .take(rows)
                .enumerate()
                .for_each(|(row, chunk)| f(row, chunk));
            return Ok(());
        }
        debug!("scheduling {rows} row chunks on {workers} workers");
        Self::install(workers, || {
            data.par_chunks_mut(stride)
                .take(rows)
                .enumerate()
                .with_max_len(1)
                .for_each(|(row, chunk)| f(row, chunk));
        })
    }
}

/// Per-worker scratch rows for one kernel call.
///
/// A worker's buffer is allocated the first time it asks for one and reused
/// for every later row it processes. All buffers are freed when the arena is
/// dropped, which the kernels do before returning.
pub struct ScratchArena<T: Send> {
    len: usize,
    slots: ThreadLocal<RefCell<Vec<T>>>,
    allocated: AtomicUsize,
}

impl<T: Copy + Default + Send> ScratchArena<T> {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            slots: ThreadLocal::new(),
            allocated: AtomicUsize::new(0),
        }
    }

    /// Length of every scratch row.
    #[inline]
    #[must_use]
    pub const fn row_len(&self) -> usize {
        self.len
    }

    /// Run `f` on the calling worker's scratch row. Contents are whatever the
    /// previous row on this worker left behind.
    ///
    /// # Errors
    /// [`KernelError::ScratchAlloc`] if the first allocation on this worker fails.
    pub fn with_row<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> Result<R> {
        let cell = self.slots.get_or_try(|| {
            let mut buf = Vec::new();
            buf.try_reserve_exact(self.len)
                .map_err(|_| KernelError::ScratchAlloc { len: self.len })?;
            buf.resize(self.len, T::default());
            self.allocated.fetch_add(1, Ordering::Relaxed);
            Ok::<_, KernelError>(RefCell::new(buf))
        })?;
        let mut buf = cell.borrow_mut();
        Ok(f(&mut buf))
    }

    /// Number of workers that have allocated a row so far.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}
