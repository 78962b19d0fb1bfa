use super::identified::IdentifiedEntity;
use nalgebra::Matrix4;

/// Anything that can be placed in a scene and drawn on the GL context it owns.
pub trait SceneObject {
    fn identity(&self) -> &IdentifiedEntity;

    fn draw(&self, projection_transform: &Matrix4<f32>, view_transform: &Matrix4<f32>);

    fn id(&self) -> u64 {
        self.identity().id()
    }

    fn name(&self) -> String {
        self.identity().name()
    }

    fn to_json(&self) -> serde_json::Value {
        self.identity().to_json()
    }
}
