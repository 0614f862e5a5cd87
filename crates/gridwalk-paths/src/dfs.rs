use crate::PathRange;
use crate::pathrange::NO_PARENT;
use crate::search::Walk;
use crate::traits::Pather;

impl PathRange {
    /// Depth-first traversal from flat index `si` until `gi` is popped.
    ///
    /// Neighbors are pushed in reverse so the LIFO pop order follows the
    /// pather's preference order. An unvisited neighbor may sit on the stack
    /// several times; its parent is whoever pushed it last, which is also the
    /// entry popped first. Stale duplicates are dropped at pop time.
    pub(crate) fn dfs_walk<P: Pather>(&mut self, pather: &P, si: usize, gi: usize) -> Walk {
        let cur = self.begin();
        self.discovered[si] = cur;
        self.parents[si] = NO_PARENT;
        self.stack.push(si);

        let mut trace = Vec::new();
        let mut found = false;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(ci) = self.stack.pop() {
            if self.visited[ci] == cur {
                continue;
            }
            self.visited[ci] = cur;
            let cp = self.point(ci);
            trace.push(cp);

            if ci == gi {
                found = true;
                break;
            }

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter().rev() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.visited[ni] == cur {
                    continue;
                }
                self.discovered[ni] = cur;
                self.parents[ni] = ci;
                self.stack.push(ni);
            }
        }

        self.nbuf = nbuf;
        let path = if found { self.reconstruct(gi) } else { Vec::new() };
        Walk { path, trace }
    }
}
