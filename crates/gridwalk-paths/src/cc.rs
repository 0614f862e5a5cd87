//! Flood fill and connected-component labelling.

use gridwalk_core::Point;

use crate::PathRange;
use crate::traits::Pather;

impl PathRange {
    /// Breadth-first flood fill from `origin` over passable cells.
    ///
    /// Returns the reached positions in discovery order, `origin` first.
    /// Each position appears once. The result is empty if `origin` is
    /// outside the range or not passable.
    pub fn reachable_from<P: Pather>(&mut self, pather: &P, origin: Point) -> Vec<Point> {
        self.cc_labels.fill(-1);
        let Some(si) = self.idx(origin) else {
            return Vec::new();
        };
        if !pather.passable(origin) {
            return Vec::new();
        }
        self.flood(pather, si, 0)
    }

    /// Label every passable cell with a connected-component ID and return
    /// the components.
    ///
    /// Components are seeded in row-major order, so component 0 contains the
    /// first passable cell. After this call use [`cc_at`](Self::cc_at) to
    /// query the label of a given point.
    pub fn cc_map_all<P: Pather>(&mut self, pather: &P) -> Vec<Vec<Point>> {
        self.cc_labels.fill(-1);
        let mut components = Vec::new();
        let mut label: i32 = 0;

        for p in self.rng.iter() {
            let Some(si) = self.idx(p) else {
                continue;
            };
            if self.cc_labels[si] >= 0 || !pather.passable(p) {
                continue;
            }
            components.push(self.flood(pather, si, label));
            label += 1;
        }

        components
    }

    /// Query the connected-component label of a point.
    ///
    /// Returns `None` if the point is outside the range or was not labelled
    /// by the last [`cc_map_all`](Self::cc_map_all) or
    /// [`reachable_from`](Self::reachable_from) call.
    pub fn cc_at(&self, p: Point) -> Option<usize> {
        let i = self.idx(p)?;
        let label = self.cc_labels[i];
        if label < 0 { None } else { Some(label as usize) }
    }

    /// Label the unlabelled cells reachable from `si` with `label`.
    fn flood<P: Pather>(&mut self, pather: &P, si: usize, label: i32) -> Vec<Point> {
        let mut result = vec![self.point(si)];
        let mut nbuf = std::mem::take(&mut self.nbuf);

        self.queue.clear();
        self.queue.push_back(si);
        self.cc_labels[si] = label;

        while let Some(ci) = self.queue.pop_front() {
            let cp = self.point(ci);
            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                if let Some(ni) = self.idx(np) {
                    if self.cc_labels[ni] < 0 {
                        self.cc_labels[ni] = label;
                        self.queue.push_back(ni);
                        result.push(np);
                    }
                }
            }
        }

        self.nbuf = nbuf;
        result
    }
}
