use crate::PathRange;
use crate::pathrange::NO_PARENT;
use crate::search::Walk;
use crate::traits::Pather;

impl PathRange {
    /// Breadth-first traversal from flat index `si` until `gi` is dequeued.
    ///
    /// A position gets its parent the first time it is discovered and is
    /// never enqueued twice, so the reconstructed path is shortest in edge
    /// count.
    pub(crate) fn bfs_walk<P: Pather>(&mut self, pather: &P, si: usize, gi: usize) -> Walk {
        let cur = self.begin();
        self.discovered[si] = cur;
        self.parents[si] = NO_PARENT;
        self.queue.push_back(si);

        let mut trace = Vec::new();
        let mut found = false;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(ci) = self.queue.pop_front() {
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

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.visited[ni] == cur || self.discovered[ni] == cur {
                    continue;
                }
                self.discovered[ni] = cur;
                self.parents[ni] = ci;
                self.queue.push_back(ni);
            }
        }

        self.nbuf = nbuf;
        let path = if found { self.reconstruct(gi) } else { Vec::new() };
        Walk { path, trace }
    }
}
