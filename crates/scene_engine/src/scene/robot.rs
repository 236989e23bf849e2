//! Articulated robot
//!
//! Eleven transform nodes: a placement node, the body under it, head, two
//! arms and two legs under the body, two eyes and two antennas under the head.
//! Each node but the placement node draws one of six shared part meshes.
//! Arms and legs swing about the x axis, each limb in opposite phase to its
//! partner, driven by the elapsed-time clock of the frame.

use super::object::{ObjectBody, Part, SceneTree};
use super::transform_tree::{NodeKey, TransformError};
use super::SceneError;
use crate::assets::SharedMesh;
use crate::config::RobotConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::foundation::time::FrameContext;

const HEAD_OFFSET: [f32; 3] = [0.0, 1.6, 0.0];
const ARM_OFFSET: [f32; 3] = [1.3, 0.4, 0.0];
const LEG_OFFSET: [f32; 3] = [0.5, -1.7, 0.0];
const EYE_OFFSET: [f32; 3] = [0.35, 0.2, 0.8];
const ANTENNA_OFFSET: [f32; 3] = [0.5, 0.9, 0.0];

/// The six part meshes a robot is assembled from
#[derive(Debug, Clone)]
pub struct RobotMeshes {
    /// Torso
    pub body: SharedMesh,
    /// Head
    pub head: SharedMesh,
    /// Used by both arms
    pub arm: SharedMesh,
    /// Used by both legs
    pub leg: SharedMesh,
    /// Used by both eyes
    pub eye: SharedMesh,
    /// Used by both antennas
    pub antenna: SharedMesh,
}

/// Limb that swings about its attachment point
#[derive(Debug, Clone, Copy)]
struct Joint {
    node: NodeKey,
    offset: Vec3,
    /// +1 or -1
    phase: f32,
}

impl Joint {
    fn local(&self, swing: f32) -> Mat4 {
        Mat4::new_translation(&self.offset) * Mat4::rotation_x(self.phase * swing)
    }
}

/// Walking robot built from a small transform hierarchy
#[derive(Debug)]
pub struct Robot {
    position: Vec3,
    joints: Vec<Joint>,
    swing_amplitude: f32,
    swing_rate: f32,
    body: ObjectBody,
}

impl Robot {
    /// Build the rig under `parent`, placed at `config.position`
    pub(crate) fn new(
        tree: &mut SceneTree,
        parent: NodeKey,
        meshes: &RobotMeshes,
        config: &RobotConfig,
        recenter: bool,
    ) -> Result<Self, SceneError> {
        let placement = tree.create_node(Mat4::new_translation(&config.position()));
        tree.attach_child(parent, placement)?;

        let mut parts = Vec::with_capacity(10);
        let body = Part::attach(tree, placement, &meshes.body, Mat4::identity(), recenter)?;
        let body_node = body.node();
        parts.push(body);

        let head = Part::attach(
            tree,
            body_node,
            &meshes.head,
            Mat4::new_translation(&Vec3::from(HEAD_OFFSET)),
            recenter,
        )?;
        let head_node = head.node();
        parts.push(head);

        let mut joints = Vec::with_capacity(4);
        for (mesh, offset, phases) in [
            (&meshes.arm, ARM_OFFSET, [1.0, -1.0]),
            (&meshes.leg, LEG_OFFSET, [-1.0, 1.0]),
        ] {
            for (side, phase) in [1.0_f32, -1.0].into_iter().zip(phases) {
                let joint = Joint {
                    node: NodeKey::default(),
                    offset: mirrored(offset, side),
                    phase,
                };
                let part = Part::attach(tree, body_node, mesh, joint.local(0.0), recenter)?;
                joints.push(Joint {
                    node: part.node(),
                    ..joint
                });
                parts.push(part);
            }
        }

        for (mesh, offset) in [(&meshes.eye, EYE_OFFSET), (&meshes.antenna, ANTENNA_OFFSET)] {
            for side in [1.0_f32, -1.0] {
                let local = Mat4::new_translation(&mirrored(offset, side));
                parts.push(Part::attach(tree, head_node, mesh, local, recenter)?);
            }
        }

        Ok(Self {
            position: config.position(),
            joints,
            swing_amplitude: config.swing_amplitude,
            swing_rate: config.swing_rate,
            body: ObjectBody::new(placement, parts),
        })
    }

    /// Swing angle of the limbs at `elapsed` seconds
    pub fn swing_angle(&self, elapsed: f32) -> f32 {
        self.swing_amplitude * (self.swing_rate * elapsed).sin()
    }

    /// World position of the rig
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the whole rig; takes effect at the next update
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub(crate) fn update(&mut self, frame: &FrameContext, tree: &mut SceneTree) -> Result<(), TransformError> {
        tree.set_local_transform(self.body.root(), Mat4::new_translation(&self.position))?;
        let swing = self.swing_angle(frame.elapsed_time);
        for joint in &self.joints {
            tree.set_local_transform(joint.node, joint.local(swing))?;
        }
        Ok(())
    }

    pub(crate) fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }
}

fn mirrored(offset: [f32; 3], side: f32) -> Vec3 {
    Vec3::new(offset[0] * side, offset[1], offset[2])
}
