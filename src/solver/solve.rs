//! Trace solving for a single hole.
//!
//! The solver is one left fold over the ordered stations. The accumulator is a
//! [`Cursor`]: the absolute position reached so far plus the station (depth and
//! tangent) it was reached at. Each step applies one minimum-curvature
//! increment and emits one trace point.

use nalgebra::Vector3;

use crate::domain::{CollarRecord, OrderedSurvey, Segment, Station, Trace, TracePoint, VerticalGuard};
use crate::error::TraceError;
use crate::math::segment;

/// Fold state: where we are and which way the hole was pointing there.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// (x = east, y = north, z = up)
    position: Vector3<f64>,
    station: Station,
}

/// Solve the trace of one hole from its collar and normalized survey.
pub fn solve(collar: &CollarRecord, survey: &OrderedSurvey, guard: VerticalGuard) -> Result<Trace, TraceError> {
    if collar.hole_id != survey.hole_id {
        return Err(TraceError::MixedHoles {
            expected: collar.hole_id.clone(),
            found: survey.hole_id.clone(),
        });
    }
    let origin = collar_position(collar)?;

    let Some((first, rest)) = survey.stations.split_first() else {
        return Ok(collar_only(collar));
    };
    if first.depth != 0.0 {
        return Err(TraceError::geometry(
            &survey.hole_id,
            first.depth,
            "survey does not start at the collar (depth 0)",
        ));
    }

    let mut points = Vec::with_capacity(survey.stations.len());
    let mut segments: Vec<Segment> = Vec::with_capacity(rest.len());
    points.push(point(&collar.hole_id, 0.0, origin, Vector3::zeros()));

    let seed = Cursor {
        position: origin,
        station: *first,
    };

    rest.iter().try_fold(seed, |cursor, next| {
        let seg = segment(&cursor.station, next, guard)
            .map_err(|fault| TraceError::geometry(&survey.hole_id, next.depth, fault.to_string()))?;

        // East/north/down increment into east/north/up coordinates.
        let step = Vector3::new(seg.d_east, seg.d_north, -seg.d_vertical);
        let position = cursor.position + step;
        if !position.iter().all(|v| v.is_finite()) {
            return Err(TraceError::geometry(&survey.hole_id, next.depth, "non-finite position"));
        }

        points.push(point(&collar.hole_id, next.depth, position, step));
        segments.push(seg);

        Ok(Cursor {
            position,
            station: *next,
        })
    })?;

    Ok(Trace {
        hole_id: collar.hole_id.clone(),
        points,
        segments,
    })
}

/// A trace consisting of the collar point only.
pub fn collar_only(collar: &CollarRecord) -> Trace {
    let origin = Vector3::new(collar.x, collar.y, collar.z);
    Trace {
        hole_id: collar.hole_id.clone(),
        points: vec![point(&collar.hole_id, 0.0, origin, Vector3::zeros())],
        segments: Vec::new(),
    }
}

fn collar_position(collar: &CollarRecord) -> Result<Vector3<f64>, TraceError> {
    let origin = Vector3::new(collar.x, collar.y, collar.z);
    if origin.iter().all(|v| v.is_finite()) {
        Ok(origin)
    } else {
        Err(TraceError::geometry(
            &collar.hole_id,
            0.0,
            format!("non-finite collar coordinates ({}, {}, {})", collar.x, collar.y, collar.z),
        ))
    }
}

fn point(hole_id: &str, depth: f64, position: Vector3<f64>, step: Vector3<f64>) -> TracePoint {
    TracePoint {
        hole_id: hole_id.to_string(),
        depth,
        x: position.x,
        y: position.y,
        z: position.z,
        dx: step.x,
        dy: step.y,
        dz: step.z,
    }
}
