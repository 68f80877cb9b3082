//! Reflective walls at 0 and `cell` on each axis
//!
//! Only one bounce is corrected per call: a particle that moves more than a
//! full cell width in one step is not mapped back correctly. Small steps keep
//! this from happening.

use crate::simulation::states::{NVec3, ParticleSet};

pub fn reflect(set: &mut ParticleSet, cell: &NVec3) {
    set.modify(|ps| {
        for p in ps.iter_mut() {
            for k in 0..3 {
                reflect_axis(&mut p.x[k], &mut p.v[k], cell[k]);
            }
        }
    });
}

fn reflect_axis(x: &mut f64, v: &mut f64, edge: f64) {
    if *x < 0.0 {
        *x = edge - x.rem_euclid(edge).abs();
        *v = v.abs();
    } else if *x > edge {
        *v = -v.abs();
        *x = edge - x.rem_euclid(edge);
    } else if *x == 0.0 && *v < 0.0 {
        // sitting on the lower wall, moving out
        *v = -*v;
    } else if *x == edge && *v > 0.0 {
        *v = -*v;
    }
}
