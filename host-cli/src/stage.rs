//! # Stage 模块
//!
//! 无窗口的渲染循环：固定帧间隔，每帧对每个作品调用一次 `update`，
//! 然后读取槽位值“绘制”（按间隔输出一行文本）。

use std::io::Write;

use anim_runtime::{AnimationEvent, Transform};
use tracing::debug;

use crate::pieces::Piece;

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    /// 推进的帧数
    pub frames: u32,
    /// 完成的动画数（含串联片段）
    pub completed: usize,
    /// 各作品的最终状态
    pub finals: Vec<(String, Transform)>,
}

/// 舞台
pub struct Stage {
    pieces: Vec<Box<dyn Piece>>,
}

impl Stage {
    pub fn new(pieces: Vec<Box<dyn Piece>>) -> Self {
        Self { pieces }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// 运行 `frames` 帧
    ///
    /// 第 0 帧与每隔 `print_every` 帧，以及最后一帧，输出所有作品的槽位值。
    pub fn run(
        &mut self,
        frames: u32,
        dt: f32,
        print_every: u32,
        out: &mut dyn Write,
    ) -> anyhow::Result<StageReport> {
        writeln!(
            out,
            "{:>6} {:>7}  {:<12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6} {:>6} {:>5}",
            "frame", "time", "piece", "pos.x", "pos.y", "pos.z", "rot.x", "rot.y", "rot.z",
            "scale", "alpha", "queue"
        )?;

        let mut completed = 0;
        for frame in 0..frames {
            let time = frame as f32 * dt;
            for piece in &mut self.pieces {
                completed += piece
                    .tick(time, dt)
                    .iter()
                    .filter(|e| matches!(e, AnimationEvent::Completed(_)))
                    .count();
            }

            let last = frame + 1 == frames;
            if frame % print_every.max(1) == 0 || last {
                for piece in &self.pieces {
                    write_row(out, frame, time + dt, piece.as_ref())?;
                }
            }
        }

        debug!(frames, completed, pieces = self.pieces.len(), "stage finished");

        Ok(StageReport {
            frames,
            completed,
            finals: self
                .pieces
                .iter()
                .map(|p| (p.name().to_string(), *p.entity().state()))
                .collect(),
        })
    }
}

fn write_row(out: &mut dyn Write, frame: u32, time: f32, piece: &dyn Piece) -> std::io::Result<()> {
    let state = piece.entity().state();
    writeln!(
        out,
        "{:>6} {:>7.3}  {:<12} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>6.3} {:>6.3} {:>5}",
        frame,
        time,
        piece.name(),
        state.position.x,
        state.position.y,
        state.position.z,
        state.rotation.x,
        state.rotation.y,
        state.rotation.z,
        state.scale,
        state.opacity,
        piece.entity().scheduler().len()
    )
}
