use crate::config::SimConfig;

/// Subcarrier permutation placing the repeated copies of each information
/// symbol as far apart as possible.
///
/// The coded stream holds the `repeat_count` copies of information symbol
/// `j` at adjacent positions `j·r .. j·r + r`. With interleaving enabled the
/// forward map sends copy `k` of symbol `j` to subcarrier `k·g + j`, where
/// `g` is the number of information symbols per OFDM symbol: the subcarriers
/// are split into `r` consecutive blocks and each block carries one copy of
/// every symbol, so copies of the same symbol are `g` subcarriers apart.
/// With interleaving disabled (or rate 1) the map is the identity and copies
/// stay adjacent.
///
/// Built once per experiment and read-only afterwards; `gather` is the exact
/// inverse of `scatter` for every constructed map.
#[derive(Debug, Clone)]
pub struct InterleaverMap {
    forward: Vec<usize>,
    inverse: Vec<usize>,
    repeat_count: usize,
}

impl InterleaverMap {
    pub fn new(config: &SimConfig) -> Self {
        let n = config.num_subcarriers();
        let r = config.repeat_count();
        let group = n / r;

        let mut forward = vec![0usize; n];
        if config.interleaving_enabled() && r > 1 {
            for j in 0..group {
                for k in 0..r {
                    forward[j * r + k] = k * group + j;
                }
            }
        } else {
            for (i, slot) in forward.iter_mut().enumerate() {
                *slot = i;
            }
        }

        let mut inverse = vec![0usize; n];
        for (src, &dst) in forward.iter().enumerate() {
            inverse[dst] = src;
        }

        Self {
            forward,
            inverse,
            repeat_count: r,
        }
    }

    /// Number of subcarriers the map permutes.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn repeat_count(&self) -> usize {
        self.repeat_count
    }

    /// Places coded-stream element `i` on its assigned subcarrier.
    pub fn scatter<T: Copy>(&self, data: &[T]) -> Vec<T> {
        debug_assert_eq!(data.len(), self.forward.len());
        let mut out = vec![data[0]; data.len()];
        for (src, &dst) in self.forward.iter().enumerate() {
            out[dst] = data[src];
        }
        out
    }

    /// Undoes [`scatter`](Self::scatter): after gathering, the
    /// `repeat_count` copies of each information symbol are adjacent again.
    pub fn gather<T: Copy>(&self, data: &[T]) -> Vec<T> {
        debug_assert_eq!(data.len(), self.inverse.len());
        let mut out = vec![data[0]; data.len()];
        for (dst, &src) in self.inverse.iter().enumerate() {
            out[dst] = data[src];
        }
        out
    }
}
