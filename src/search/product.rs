//! Lazy enumeration of cross products and category subsets.
//!
//! Nothing here materialises the product: the cursor advances one combination
//! at a time and hands out a borrowed slice.

/// Odometer over the cross product of index lists.
///
/// Yields combinations in lexicographic order of positions, last list varying
/// fastest. Empty lists (or no lists) yield nothing.
pub(crate) struct CrossProduct<'a> {
    lists: Vec<&'a [u32]>,
    cursor: Vec<usize>,
    current: Vec<u32>,
    state: CursorState,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Fresh,
    Running,
    Exhausted,
}

impl<'a> CrossProduct<'a> {
    pub(crate) fn new(lists: Vec<&'a [u32]>) -> Self {
        let state = if lists.is_empty() || lists.iter().any(|l| l.is_empty()) {
            CursorState::Exhausted
        } else {
            CursorState::Fresh
        };
        let k = lists.len();
        Self {
            lists,
            cursor: vec![0; k],
            current: Vec::with_capacity(k),
            state,
        }
    }

    /// Number of combinations, saturating at `u128::MAX`.
    #[cfg(test)]
    pub(crate) fn total(&self) -> u128 {
        product_len(self.lists.iter().map(|l| l.len()))
    }

    /// Advance to the next combination.
    pub(crate) fn next_combination(&mut self) -> Option<&[u32]> {
        match self.state {
            CursorState::Exhausted => return None,
            CursorState::Fresh => {
                self.state = CursorState::Running;
                self.current.clear();
                self.current.extend(self.lists.iter().map(|l| l[0]));
                return Some(&self.current);
            }
            CursorState::Running => {}
        }

        // Increment the rightmost position that has room, resetting those after it.
        let mut pos = self.lists.len();
        loop {
            if pos == 0 {
                self.state = CursorState::Exhausted;
                return None;
            }
            pos -= 1;
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.lists[pos].len() {
                self.current[pos] = self.lists[pos][self.cursor[pos]];
                break;
            }
            self.cursor[pos] = 0;
            self.current[pos] = self.lists[pos][0];
        }

        Some(&self.current)
    }
}

/// Product of lengths, saturating at `u128::MAX`. Empty input gives 1.
pub(crate) fn product_len(lens: impl IntoIterator<Item = usize>) -> u128 {
    lens.into_iter()
        .fold(1u128, |acc, len| acc.saturating_mul(len as u128))
}

/// Lexicographic `r`-subsets of `0..n`.
pub(crate) struct Subsets {
    n: usize,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl Subsets {
    pub(crate) fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            current: (0..r).collect(),
            started: false,
            done: r > n,
        }
    }
}

impl Iterator for Subsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }

        let r = self.current.len();
        // Rightmost position that can still move right.
        let Some(i) = (0..r).rev().find(|&i| self.current[i] < self.n - r + i) else {
            self.done = true;
            return None;
        };
        self.current[i] += 1;
        for j in i + 1..r {
            self.current[j] = self.current[j - 1] + 1;
        }
        Some(self.current.clone())
    }
}
