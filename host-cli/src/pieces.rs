//! # Pieces 模块
//!
//! 内置作品：每个作品拥有一个 `AnimatedEntity<Transform>`，
//! 并在特定时间点模拟一次交互（悬停、点击、离场）。

use std::f32::consts::{PI, TAU};
use std::path::Path;

use anim_runtime::{
    AnimatedEntity, Animation, AnimationEvent, AnimationScheduler, AnimationTag, Choreography,
    EasingFunction, Transform, TransformProperty,
};
use anyhow::Context;
use tracing::{debug, info};

use crate::config::PieceKind;

/// 翻转动画的标签
pub const FLIP: AnimationTag = AnimationTag::from_static("flip");

/// 棱镜卡片旋转一周的时长（秒）
const PRISM_PERIOD: f32 = 4.0;

/// 舞台上的作品
pub trait Piece {
    /// 作品名称
    fn name(&self) -> &str;

    fn entity(&self) -> &AnimatedEntity<Transform>;

    fn entity_mut(&mut self) -> &mut AnimatedEntity<Transform>;

    /// 本帧 `update` 之前的交互钩子
    fn interact(&mut self, _time: f32) {}

    /// 推进一帧，返回本帧的动画事件
    fn tick(&mut self, time: f32, dt: f32) -> Vec<AnimationEvent> {
        self.interact(time);
        self.entity_mut().update(dt)
    }
}

/// 创建内置作品
pub fn build(kind: PieceKind) -> Box<dyn Piece> {
    match kind {
        PieceKind::Prism => Box::new(PrismCard::new()),
        PieceKind::Flip => Box::new(FlipCard::new()),
        PieceKind::Ticket => Box::new(TicketDrop::new()),
    }
}

// ========== 棱镜卡片 ==========

/// 持续绕 Y 轴旋转的全息卡片
///
/// 每转完一周，由完成回调追加下一周。
pub struct PrismCard {
    entity: AnimatedEntity<Transform>,
}

impl PrismCard {
    pub fn new() -> Self {
        let mut entity = AnimatedEntity::new(Transform::with_opacity(0.0));
        entity.animate(
            TransformProperty::Opacity,
            0.0,
            1.0,
            0.8,
            EasingFunction::EaseOutSine,
        );
        entity.enqueue(spin_leg(0.0));
        Self { entity }
    }
}

/// 一周旋转；完成后从当前角度（折回 `[0, 2π)`）继续下一周
fn spin_leg(from: f32) -> Animation<Transform> {
    Animation::<Transform>::new(TransformProperty::RotationY, from, from + TAU, PRISM_PERIOD)
        .with_tag("spin")
        .on_complete(|scheduler, card| {
            scheduler.enqueue(spin_leg(card.rotation.y.rem_euclid(TAU)));
        })
}

impl Piece for PrismCard {
    fn name(&self) -> &str {
        "prism"
    }

    fn entity(&self) -> &AnimatedEntity<Transform> {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut AnimatedEntity<Transform> {
        &mut self.entity
    }
}

// ========== 翻转卡片 ==========

/// 卡片交互
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interaction {
    /// 鼠标悬停：轻微倾斜
    Hover,
    /// 鼠标离开：回正
    Leave,
    /// 点击：翻面
    Flip,
}

/// 翻转卡片：“想法 / 执行”两面
///
/// 翻面动画带 `flip` 标签，进行中时忽略悬停倾斜。
pub struct FlipCard {
    entity: AnimatedEntity<Transform>,
    face_up: bool,
    timeline: Vec<(f32, Interaction)>,
    cursor: usize,
}

impl FlipCard {
    const TILT: f32 = 0.25;

    pub fn new() -> Self {
        Self {
            entity: AnimatedEntity::new(Transform::identity()),
            face_up: false,
            timeline: vec![
                (0.2, Interaction::Hover),
                (0.5, Interaction::Flip),
                // 翻面进行中，倾斜被抑制
                (0.8, Interaction::Hover),
                (1.5, Interaction::Hover),
                (2.0, Interaction::Leave),
            ],
            cursor: 0,
        }
    }

    fn hover(&mut self, tilt: f32) {
        if self.entity.has_tag(FLIP.as_str()) {
            debug!(piece = "flip", "翻面进行中，忽略倾斜");
            return;
        }
        self.entity.animate_replacing(
            TransformProperty::RotationX,
            tilt,
            0.15,
            EasingFunction::EaseOutQuad,
        );
    }

    fn flip(&mut self) {
        self.face_up = !self.face_up;
        let target = if self.face_up { PI } else { 0.0 };

        // 丢弃非翻面的 Y 旋转与倾斜，翻面本身不打断
        self.entity.cancel(|a| {
            let rotation = matches!(
                a.property,
                TransformProperty::RotationY | TransformProperty::RotationX
            );
            rotation && !a.has_tag(FLIP.as_str())
        });

        let from = self.entity.value(TransformProperty::RotationY);
        self.entity.enqueue(
            Animation::<Transform>::new(TransformProperty::RotationY, from, target, 0.6)
                .with_easing(EasingFunction::EaseInOutCubic)
                .with_tag(FLIP),
        );
        let tilt = self.entity.value(TransformProperty::RotationX);
        self.entity.animate(
            TransformProperty::RotationX,
            tilt,
            0.0,
            0.2,
            EasingFunction::EaseOutQuad,
        );
        // 翻面时轻微放大再回落
        self.entity.enqueue(
            Animation::<Transform>::new(TransformProperty::Scale, 1.0, 1.08, 0.3)
                .with_easing(EasingFunction::EaseOutQuad)
                .with_tag(FLIP)
                .on_complete(|scheduler, card| {
                    scheduler.enqueue(
                        Animation::<Transform>::new(TransformProperty::Scale, card.scale, 1.0, 0.3)
                            .with_easing(EasingFunction::EaseInQuad)
                            .with_tag(FLIP),
                    );
                }),
        );
        info!(piece = "flip", face_up = self.face_up, "翻面");
    }
}

impl Piece for FlipCard {
    fn name(&self) -> &str {
        "flip"
    }

    fn entity(&self) -> &AnimatedEntity<Transform> {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut AnimatedEntity<Transform> {
        &mut self.entity
    }

    fn interact(&mut self, time: f32) {
        while let Some(&(at, interaction)) = self.timeline.get(self.cursor) {
            if time < at {
                break;
            }
            self.cursor += 1;
            match interaction {
                Interaction::Hover => self.hover(Self::TILT),
                Interaction::Leave => self.hover(0.0),
                Interaction::Flip => self.flip(),
            }
        }
    }
}

// ========== 票据 ==========

/// 从高处落下、回弹、最后离场的票据
pub struct TicketDrop {
    entity: AnimatedEntity<Transform>,
    exit_at: f32,
    exited: bool,
}

impl TicketDrop {
    pub fn new() -> Self {
        let mut entity = AnimatedEntity::new(Transform {
            opacity: 0.0,
            ..Transform::with_position(0.0, 0.0, 3.0)
        });

        // 落下与淡入并行，曲线各自独立
        entity.enqueue(
            Animation::<Transform>::new(TransformProperty::PositionZ, 3.0, 0.0, 0.5)
                .with_easing(EasingFunction::EaseOutCubic)
                .on_complete(bounce),
        );
        entity.animate(
            TransformProperty::Opacity,
            0.0,
            1.0,
            0.4,
            EasingFunction::EaseOutQuad,
        );

        Self {
            entity,
            exit_at: 2.0,
            exited: false,
        }
    }
}

/// 回弹：弹起后再落回
fn bounce(scheduler: &mut AnimationScheduler<Transform>, ticket: &Transform) {
    scheduler.enqueue(
        Animation::<Transform>::new(TransformProperty::PositionZ, ticket.position.z, 0.3, 0.15)
            .with_easing(EasingFunction::EaseOutQuad)
            .on_complete(|scheduler, ticket| {
                scheduler.animate(
                    TransformProperty::PositionZ,
                    ticket.position.z,
                    0.0,
                    0.2,
                    EasingFunction::EaseInQuad,
                );
            }),
    );
}

impl Piece for TicketDrop {
    fn name(&self) -> &str {
        "ticket"
    }

    fn entity(&self) -> &AnimatedEntity<Transform> {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut AnimatedEntity<Transform> {
        &mut self.entity
    }

    fn interact(&mut self, time: f32) {
        if self.exited || time < self.exit_at {
            return;
        }
        self.exited = true;
        self.entity.animate_replacing(
            TransformProperty::PositionZ,
            -15.0,
            0.6,
            EasingFunction::EaseInCubic,
        );
        self.entity.animate_replacing(
            TransformProperty::Opacity,
            0.0,
            0.6,
            EasingFunction::EaseInQuad,
        );
        info!(piece = "ticket", "离场");
    }
}

// ========== 编排 ==========

/// 由编排文件驱动的作品
pub struct ChoreographyPiece {
    name: String,
    entity: AnimatedEntity<Transform>,
}

impl ChoreographyPiece {
    pub fn new(choreography: &Choreography<TransformProperty>) -> Self {
        let mut entity = AnimatedEntity::new(Transform::identity());
        let state = *entity.state();
        choreography.schedule(entity.scheduler_mut(), &state);
        Self {
            name: choreography.name.clone(),
            entity,
        }
    }

    /// 从文件加载编排
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取编排文件 {}", path.display()))?;
        let mut choreography = Choreography::<TransformProperty>::from_json(&content)
            .with_context(|| format!("编排文件无效 {}", path.display()))?;
        if choreography.name.is_empty() {
            choreography.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "choreography".to_string());
        }
        info!(
            name = %choreography.name,
            legs = choreography.leg_count(),
            "编排加载成功"
        );
        Ok(Self::new(&choreography))
    }
}

impl Piece for ChoreographyPiece {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity(&self) -> &AnimatedEntity<Transform> {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut AnimatedEntity<Transform> {
        &mut self.entity
    }
}
