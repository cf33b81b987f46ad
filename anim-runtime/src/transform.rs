//! # Transform 模块
//!
//! 卡片/物体的变换状态：位置、旋转、统一缩放与透明度。

use std::fmt;
use std::str::FromStr;

use crate::error::AnimError;
use crate::property::{AnimProperty, Animatable};

/// 三维向量
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// 变换状态
///
/// 表示一个可动画物体的完整变换，是调度器写入的“当前值槽位”。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// 位置
    pub position: Vec3,
    /// 旋转（欧拉角，弧度）
    pub rotation: Vec3,
    /// 统一缩放
    pub scale: f32,
    /// 透明度
    pub opacity: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl Transform {
    /// 创建默认变换（原点、无旋转、原始大小、完全不透明）
    pub fn identity() -> Self {
        Self::default()
    }

    /// 创建只有透明度的变换
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }

    /// 创建只有位置的变换
    pub fn with_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::default()
        }
    }
}

/// `Transform` 的可动画槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformProperty {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    Scale,
    Opacity,
}

impl AnimProperty for TransformProperty {
    fn name(&self) -> &'static str {
        match self {
            Self::PositionX => "positionX",
            Self::PositionY => "positionY",
            Self::PositionZ => "positionZ",
            Self::RotationX => "rotationX",
            Self::RotationY => "rotationY",
            Self::RotationZ => "rotationZ",
            Self::Scale => "scale",
            Self::Opacity => "opacity",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::PositionX,
            Self::PositionY,
            Self::PositionZ,
            Self::RotationX,
            Self::RotationY,
            Self::RotationZ,
            Self::Scale,
            Self::Opacity,
        ]
    }
}

impl FromStr for TransformProperty {
    type Err = AnimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for TransformProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Animatable for Transform {
    type Property = TransformProperty;

    fn value(&self, property: TransformProperty) -> f32 {
        match property {
            TransformProperty::PositionX => self.position.x,
            TransformProperty::PositionY => self.position.y,
            TransformProperty::PositionZ => self.position.z,
            TransformProperty::RotationX => self.rotation.x,
            TransformProperty::RotationY => self.rotation.y,
            TransformProperty::RotationZ => self.rotation.z,
            TransformProperty::Scale => self.scale,
            TransformProperty::Opacity => self.opacity,
        }
    }

    fn set_value(&mut self, property: TransformProperty, value: f32) {
        match property {
            TransformProperty::PositionX => self.position.x = value,
            TransformProperty::PositionY => self.position.y = value,
            TransformProperty::PositionZ => self.position.z = value,
            TransformProperty::RotationX => self.rotation.x = value,
            TransformProperty::RotationY => self.rotation.y = value,
            TransformProperty::RotationZ => self.rotation.z = value,
            TransformProperty::Scale => self.scale = value,
            TransformProperty::Opacity => self.opacity = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::zero());
        assert_eq!(t.rotation, Vec3::zero());
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.opacity, 1.0);
    }

    #[test]
    fn test_transform_constructors() {
        let t = Transform::with_position(10.0, 0.0, -4.0);
        assert_eq!(t.position, Vec3::new(10.0, 0.0, -4.0));
        assert_eq!(t.opacity, 1.0);
        assert_eq!(Transform::with_opacity(0.0).scale, 1.0);
    }

    #[test]
    fn test_every_slot_round_trips() {
        let mut t = Transform::identity();
        for (i, property) in TransformProperty::all().iter().enumerate() {
            t.set_value(*property, i as f32 + 0.5);
        }
        for (i, property) in TransformProperty::all().iter().enumerate() {
            assert_eq!(t.value(*property), i as f32 + 0.5, "{property}");
        }
    }

    #[test]
    fn test_parse_property_names() {
        assert_eq!(
            "positionZ".parse::<TransformProperty>(),
            Ok(TransformProperty::PositionZ)
        );
        assert_eq!(
            "rotation_y".parse::<TransformProperty>(),
            Ok(TransformProperty::RotationY)
        );
        assert_eq!(
            "opacity".parse::<TransformProperty>(),
            Ok(TransformProperty::Opacity)
        );
        assert!(matches!(
            "positionW".parse::<TransformProperty>(),
            Err(AnimError::InvalidPropertyKind { .. })
        ));
    }
}
