use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{ClipError, ClipResult};
use crate::overlay::canvas::CropFrame;
use crate::settings::RenderSettings;
use crate::snippet::observation::ObservationData;
use crate::trajectory::{TrajectoryError, TrajectoryMap, keypoints, posture_segments};

/// Lightness factor applied to the label box fill.
const BOX_FILL_LIGHTNESS: f64 = 1.5;
const BOX_FILL_ALPHA: f64 = 0.5;

/// Overlay role of a tracked individual; also its draw order (higher draws on top).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Other = 0,
    Recipient = 1,
    Actor = 2,
}

/// A category label with its rounded background box.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelItem {
    pub text: String,
    pub text_color: Color,
    pub edge_color: Color,
    pub fill_color: Color,
    pub highlighted: bool,
}

/// Skeleton of one individual in axes-fraction coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonItem {
    pub individual: String,
    pub role: Role,
    pub color: Color,
    pub segments: Vec<(Point, Point)>,
    pub keypoints: Vec<Point>,
}

/// Everything drawn over one frame. Skeletons are ordered bottom to top; labels go above.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayScene {
    pub skeletons: Vec<SkeletonItem>,
    pub labels: Vec<LabelItem>,
}

impl OverlayScene {
    pub fn is_empty(&self) -> bool {
        self.skeletons.is_empty() && self.labels.is_empty()
    }
}

/// Build the overlay of global frame `frame`.
///
/// Fails with a feature error when the selected keypoints or segments do not exist in a
/// trajectory; individuals without data at `frame` are skipped.
pub fn build_scene(
    frame: u64,
    data: &ObservationData,
    trajectories: &TrajectoryMap,
    settings: &RenderSettings,
    crop: &CropFrame,
) -> ClipResult<OverlayScene> {
    let mut scene = OverlayScene::default();
    let mut highlight_color: Option<Color> = None;

    for (idx, observation) in data.observations.iter().enumerate() {
        if !observation.spans(frame) {
            continue;
        }
        let highlighted = settings.highlight && data.highlight.contains(&idx);
        if highlighted {
            highlight_color = Some(settings.highlight_color_for(&observation.category));
        }
        if !settings.draw_label {
            continue;
        }
        let (text_color, edge_color) = match highlight_color {
            Some(c) if highlighted => (c, c),
            _ => (settings.text_color, settings.box_color),
        };
        scene.labels.push(LabelItem {
            text: observation.category.clone(),
            text_color,
            edge_color,
            fill_color: edge_color
                .adjust_lightness(BOX_FILL_LIGHTNESS)
                .with_alpha(BOX_FILL_ALPHA),
            highlighted,
        });
    }

    if !settings.draw_trajectories {
        return Ok(scene);
    }

    let (actor, recipient) = data.roles();
    let segment_pairs = settings.segment_pairs();
    for (individual, trajectory) in trajectories {
        let window = match trajectory.slice_window(frame, frame) {
            Ok(window) if !window.is_empty() => window,
            Ok(_) | Err(TrajectoryError::OutOfInterval { .. }) => continue,
            Err(e) => return Err(feature_error(individual, e)),
        };
        let points = keypoints(&window, &settings.keypoints)
            .map_err(|e| feature_error(individual, e))?;
        let segments = posture_segments(&window, &segment_pairs)
            .map_err(|e| feature_error(individual, e))?;

        let role = if Some(individual.as_str()) == actor {
            Role::Actor
        } else if Some(individual.as_str()) == recipient {
            Role::Recipient
        } else {
            Role::Other
        };
        let color = match (role, highlight_color) {
            (Role::Actor, Some(c)) if settings.apply_highlight_color_to_actor() => c,
            (Role::Recipient, Some(c)) if settings.apply_highlight_color_to_recipient() => c,
            (Role::Actor, _) => settings.actor_color,
            (Role::Recipient, _) => settings.recipient_color,
            (Role::Other, _) => settings.other_color,
        };

        scene.skeletons.push(SkeletonItem {
            individual: individual.clone(),
            role,
            color,
            segments: segments
                .into_iter()
                .next()
                .unwrap_or_default()
                .into_iter()
                .filter(|(a, b)| is_finite(*a) && is_finite(*b))
                .map(|(a, b)| (crop.to_axes(a), crop.to_axes(b)))
                .collect(),
            keypoints: points
                .into_iter()
                .next()
                .unwrap_or_default()
                .into_iter()
                .filter(|p| is_finite(*p))
                .map(|p| crop.to_axes(p))
                .collect(),
        });
    }
    scene.skeletons.sort_by_key(|s| s.role);
    Ok(scene)
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

fn feature_error(individual: &str, e: TrajectoryError) -> ClipError {
    ClipError::feature(format!("individual '{individual}': {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/scene.rs"]
mod tests;
