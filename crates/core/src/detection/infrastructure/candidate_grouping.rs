//! Post-processing of raw detector candidates into face boxes.

use crate::shared::face_box::FaceBox;

/// Relative edge tolerance for two candidates to count as the same face.
const SIMILARITY_EPS: f64 = 0.2;

/// A candidate box straight from the network, in frame coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl RawDetection {
    fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    fn to_face_box(&self) -> FaceBox {
        FaceBox::new(
            self.x1.round() as i32,
            self.y1.round() as i32,
            self.width().round() as i32,
            self.height().round() as i32,
        )
    }
}

/// Clusters overlapping candidates and keeps clusters with more than
/// `min_neighbors` members, each averaged into one box.
///
/// Two candidates are neighbours when every edge lies within
/// `SIMILARITY_EPS` of the smaller box's mean side and their sizes are at
/// most two `scale_factor` steps apart. Output follows the order of each
/// cluster's first candidate.
pub fn group_candidates(
    dets: &[RawDetection],
    scale_factor: f64,
    min_neighbors: u32,
) -> Vec<FaceBox> {
    let n = dets.len();
    let mut parent: Vec<usize> = (0..n).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            if are_neighbors(&dets[i], &dets[j], scale_factor) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    // root -> (member count, summed corners)
    let mut clusters: Vec<(usize, usize, [f64; 4])> = Vec::new();
    for (i, det) in dets.iter().enumerate() {
        let root = find(&mut parent, i);
        let slot = match clusters.iter().position(|c| c.0 == root) {
            Some(pos) => pos,
            None => {
                clusters.push((root, 0, [0.0; 4]));
                clusters.len() - 1
            }
        };
        let (_, count, sums) = &mut clusters[slot];
        *count += 1;
        sums[0] += det.x1;
        sums[1] += det.y1;
        sums[2] += det.x2;
        sums[3] += det.y2;
    }

    clusters
        .into_iter()
        .filter(|(_, count, _)| *count > min_neighbors as usize)
        .map(|(_, count, sums)| {
            let k = count as f64;
            RawDetection {
                x1: sums[0] / k,
                y1: sums[1] / k,
                x2: sums[2] / k,
                y2: sums[3] / k,
                confidence: 0.0,
            }
            .to_face_box()
        })
        .collect()
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn are_neighbors(a: &RawDetection, b: &RawDetection, scale_factor: f64) -> bool {
    let delta =
        SIMILARITY_EPS * (a.width().min(b.width()) + a.height().min(b.height())) * 0.5;
    let edges_close = (a.x1 - b.x1).abs() <= delta
        && (a.y1 - b.y1).abs() <= delta
        && (a.x2 - b.x2).abs() <= delta
        && (a.y2 - b.y2).abs() <= delta;
    if !edges_close {
        return false;
    }

    let (wa, wb) = (a.width().max(f64::EPSILON), b.width().max(f64::EPSILON));
    wa.max(wb) / wa.min(wb) <= scale_factor * scale_factor
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
pub fn nms(dets: &mut [RawDetection], iou_thresh: f64) -> Vec<FaceBox> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].to_face_box());
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && bbox_iou(&dets[i], &dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn bbox_iou(a: &RawDetection, b: &RawDetection) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = a.width() * a.height();
    let area_b = b.width() * b.height();
    inter / (area_a + area_b - inter)
}
