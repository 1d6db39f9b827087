// crates/gr_physics/src/engine/stepper.rs

//! 约束输运时间推进器
//!
//! 二阶预估-校正，每个阶段都经过 flux-CT 改写磁场通量：
//!
//! ```text
//! 预估: U_old = P2C(P_old)
//!       U*    = U_old − ½dt·div F(P_old) + ½dt·S(P_old)
//!       P_half = C2P(U*)，交换 ghost，施加边界
//! 校正: U_new = U_old − dt·div F(P_half) + dt·S(P_half)
//!       P_new = C2P(U_new)，交换 ghost，施加边界
//! 提交: swap(P_old, P_new)，t += dt
//! ```
//!
//! 任一阶段失败时 `prim_old` 与时间保持不变，由调用方决定是否重试。

use std::mem;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use super::ct::{advance_interior, EdgeEmf};
use super::metrics::StepMetrics;
use crate::boundary::{sync_ghosts, BoundaryConditions, HaloExchange, SerialExchange};
use crate::diagnostics::{compute_div_b, DivergenceField};
use crate::geometry::Geometry;
use crate::schemes::{FaceFluxes, FluxScheme, PrimitiveRecovery};
use crate::state::FluidState;
use gr_foundation::constants::vars;
use gr_foundation::{GrError, GrResult, StepStage};

/// 约束输运推进器
pub struct CtStepper<F, R, H = SerialExchange> {
    geometry: Arc<Geometry>,
    scheme: F,
    recovery: R,
    halo: H,
    boundaries: BoundaryConditions,

    prim_old: FluidState,
    prim_half: FluidState,
    prim_new: FluidState,
    cons_old: FluidState,
    cons_stage: FluidState,
    sources: FluidState,
    fluxes: FaceFluxes,
    emf: EdgeEmf,

    time: f64,
    dt: f64,
    metrics: StepMetrics,
}

impl<F, R, H> CtStepper<F, R, H>
where
    F: FluxScheme,
    R: PrimitiveRecovery,
    H: HaloExchange,
{
    /// 创建推进器，并填充初始状态的 ghost 层
    ///
    /// # 错误
    ///
    /// - `InvalidGrid`: 初始状态尺寸与网格不符
    /// - `InvalidParameter`: 变量数不足、dt 非正，或边界配置与网格不兼容
    /// - `NotReady`: ghost 层宽度小于通量模板宽度
    pub fn new(
        geometry: Arc<Geometry>,
        scheme: F,
        recovery: R,
        halo: H,
        boundaries: BoundaryConditions,
        initial: FluidState,
        dt: f64,
    ) -> GrResult<Self> {
        let grid = geometry.grid();
        initial.check_grid(grid)?;
        if initial.num_vars() < vars::MIN_VARS {
            return Err(GrError::invalid_parameter(format!(
                "约束输运需要至少 {} 个变量，当前 {}",
                vars::MIN_VARS,
                initial.num_vars()
            )));
        }
        Self::check_dt(dt)?;

        let width = scheme.stencil_width().max(1);
        for axis in 0..grid.dim() {
            if grid.ghost(axis) < width {
                return Err(GrError::not_ready(format!(
                    "格式 {} 需要 X{} 方向至少 {} 层 ghost，当前 {}",
                    scheme.name(),
                    axis + 1,
                    width,
                    grid.ghost(axis)
                )));
            }
        }
        boundaries.validate(grid)?;

        let mut prim_old = initial;
        sync_ghosts(&halo, &boundaries, grid, &mut prim_old)?;

        let num_vars = prim_old.num_vars();
        let metrics = StepMetrics {
            active_zones: grid.interior().len(),
            ..Default::default()
        };

        info!(
            "约束输运推进器: 格式 {}, 恢复 {}, 交换 {}, dt = {}, 变量 {}",
            scheme.name(),
            recovery.name(),
            halo.name(),
            dt,
            num_vars
        );

        Ok(Self {
            prim_half: prim_old.clone_structure(),
            prim_new: prim_old.clone_structure(),
            cons_old: prim_old.clone_structure(),
            cons_stage: prim_old.clone_structure(),
            sources: prim_old.clone_structure(),
            fluxes: FaceFluxes::new(num_vars, grid),
            emf: EdgeEmf::new(grid),
            prim_old,
            geometry,
            scheme,
            recovery,
            halo,
            boundaries,
            time: 0.0,
            dt,
            metrics,
        })
    }

    /// 设置起始时间
    pub fn with_start_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    fn check_dt(dt: f64) -> GrResult<()> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(GrError::invalid_parameter(format!("时间步长 dt = {} 无效", dt)));
        }
        Ok(())
    }

    // ========================================================================
    // 推进
    // ========================================================================

    /// 推进一个时间步
    pub fn time_step(&mut self) -> GrResult<()> {
        let step_start = Instant::now();
        match self.advance() {
            Ok(()) => {
                mem::swap(&mut self.prim_old, &mut self.prim_new);
                self.time += self.dt;
                self.metrics.record_step(step_start.elapsed());
                debug!(
                    "时间步完成: t = {:.6}, 耗时 {:?}",
                    self.time, self.metrics.last_step
                );
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(
                    "时间步失败 (步数: {}, t = {:.6}): {}",
                    self.metrics.steps_completed, self.time, e
                );
                Err(e)
            }
        }
    }

    /// 连续推进到 `end_time`，每 `log_interval` 步输出统计
    pub fn run_until(&mut self, end_time: f64, log_interval: u64) -> GrResult<()> {
        info!("开始推进: t = {:.4} → {:.4}", self.time, end_time);
        let interval = log_interval.max(1);
        // 留半步余量，避免舍入多走一步
        while self.time + 0.5 * self.dt < end_time {
            self.time_step()?;
            if self.metrics.steps_completed % interval == 0 {
                self.record_div_b();
                self.metrics.log();
            }
        }
        info!("推进完成: t = {:.4}", self.time);
        Ok(())
    }

    /// 两个阶段，结果写入 `prim_new`
    fn advance(&mut self) -> GrResult<()> {
        let geometry: &Geometry = &self.geometry;
        let grid = geometry.grid();
        let interior = grid.interior();
        let dt = self.dt;

        self.recovery
            .prim_to_cons(geometry, &self.prim_old, &mut self.cons_old, &interior)?;

        // 预估
        Self::stage_fluxes(
            &self.scheme,
            geometry,
            &self.prim_old,
            &mut self.fluxes,
            &mut self.emf,
            &mut self.sources,
        )?;
        advance_interior(
            grid,
            &self.cons_old,
            &self.fluxes,
            &self.sources,
            0.5 * dt,
            &mut self.cons_stage,
        );
        self.cons_stage.validate(&interior, StepStage::Predictor)?;

        self.prim_half.copy_from(&self.prim_old);
        self.recovery
            .cons_to_prim(geometry, &self.cons_stage, &mut self.prim_half, &interior)
            .map_err(|f| GrError::non_finite(f.zone, StepStage::Predictor, f.variable))?;
        sync_ghosts(&self.halo, &self.boundaries, grid, &mut self.prim_half)?;

        // 校正
        Self::stage_fluxes(
            &self.scheme,
            geometry,
            &self.prim_half,
            &mut self.fluxes,
            &mut self.emf,
            &mut self.sources,
        )?;
        advance_interior(
            grid,
            &self.cons_old,
            &self.fluxes,
            &self.sources,
            dt,
            &mut self.cons_stage,
        );
        self.cons_stage.validate(&interior, StepStage::Corrector)?;

        self.prim_new.copy_from(&self.prim_half);
        self.recovery
            .cons_to_prim(geometry, &self.cons_stage, &mut self.prim_new, &interior)
            .map_err(|f| GrError::non_finite(f.zone, StepStage::Corrector, f.variable))?;
        sync_ghosts(&self.halo, &self.boundaries, grid, &mut self.prim_new)?;

        Ok(())
    }

    /// 面通量 → EMF → 通量改写 → 源项
    fn stage_fluxes(
        scheme: &F,
        geometry: &Geometry,
        prim: &FluidState,
        fluxes: &mut FaceFluxes,
        emf: &mut EdgeEmf,
        sources: &mut FluidState,
    ) -> GrResult<()> {
        scheme.face_fluxes(geometry, prim, fluxes)?;
        emf.compute(fluxes);
        emf.replace_fluxes(geometry.grid(), fluxes);
        scheme.source_terms(geometry, prim, sources)
    }

    // ========================================================================
    // 诊断与访问
    // ========================================================================

    /// 当前状态的角点磁场散度
    pub fn compute_div_b(&self) -> DivergenceField {
        compute_div_b(&self.geometry, &self.prim_old)
    }

    /// 计算 max|div B| 并记入统计
    pub fn record_div_b(&mut self) -> f64 {
        let max = self.compute_div_b().max_abs();
        self.metrics.last_div_b = Some(max);
        max
    }

    /// 当前时间
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 时间步长
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 修改时间步长
    pub fn set_dt(&mut self, dt: f64) -> GrResult<()> {
        Self::check_dt(dt)?;
        self.dt = dt;
        Ok(())
    }

    /// 当前原始量（含 ghost）
    #[inline]
    pub fn prim(&self) -> &FluidState {
        &self.prim_old
    }

    /// 几何
    #[inline]
    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// 边界条件
    #[inline]
    pub fn boundaries(&self) -> &BoundaryConditions {
        &self.boundaries
    }

    /// 推进统计
    #[inline]
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// 通量格式
    #[inline]
    pub fn scheme(&self) -> &F {
        &self.scheme
    }

    /// 恢复算法
    #[inline]
    pub fn recovery(&self) -> &R {
        &self.recovery
    }
}
