// crates/gr_physics/src/builder.rs

//! 由配置组装模拟：网格 → 几何 → 推进器

use std::sync::Arc;

use tracing::info;

use crate::boundary::{BoundaryConditions, SerialExchange};
use crate::engine::CtStepper;
use crate::geometry::{ConnectionStencil, Geometry, GeometryParameters};
use crate::grid::CoordinateGrid;
use crate::schemes::{DensitizedRecovery, InductionFlux};
use crate::state::FluidState;
use gr_config::{SimulationConfig, SpacetimeKind};
use gr_foundation::GrResult;

/// 参考配置下的推进器类型
pub type ReferenceStepper = CtStepper<InductionFlux, DensitizedRecovery, SerialExchange>;

/// 模拟构建器
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    stencil: ConnectionStencil,
}

impl SimulationBuilder {
    /// 校验配置并创建构建器
    pub fn from_config(config: SimulationConfig) -> GrResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stencil: ConnectionStencil::default(),
        })
    }

    /// 指定联络系数差分模板
    pub fn with_connection_stencil(mut self, stencil: ConnectionStencil) -> Self {
        self.stencil = stencil;
        self
    }

    /// 配置
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// 几何参数
    pub fn geometry_parameters(&self) -> GeometryParameters {
        match self.config.spacetime.kind {
            SpacetimeKind::Flat => GeometryParameters::flat(),
            SpacetimeKind::ModifiedKerrSchild => GeometryParameters::new(
                self.config.spacetime.black_hole_spin,
                self.config.spacetime.h_slope,
            ),
        }
    }

    /// 坐标网格
    pub fn build_grid(&self) -> GrResult<CoordinateGrid> {
        CoordinateGrid::from_config(&self.config.grid)
    }

    /// 几何（含联络系数）
    ///
    /// 参考推进器不含几何源项，联络系数供实现 [`FluxScheme::source_terms`]
    /// 的外部格式通过 [`Geometry::connection_at`] 读取。
    ///
    /// [`FluxScheme::source_terms`]: crate::schemes::FluxScheme::source_terms
    pub fn build_geometry(&self) -> GrResult<Geometry> {
        let grid = self.build_grid()?;
        let mut geometry =
            Geometry::build(grid, self.config.spacetime.kind, self.geometry_parameters())?;
        geometry.compute_connection_coefficients(self.stencil)?;
        Ok(geometry)
    }

    /// 边界条件
    pub fn boundaries(&self) -> BoundaryConditions {
        BoundaryConditions::new(self.config.boundaries.clone())
    }

    /// 全零初始状态
    pub fn initial_state(&self, grid: &CoordinateGrid) -> FluidState {
        FluidState::new(self.config.num_vars, grid)
    }

    /// 参考推进器
    pub fn build_stepper(
        &self,
        geometry: Arc<Geometry>,
        initial: FluidState,
    ) -> GrResult<ReferenceStepper> {
        let stepper = CtStepper::new(
            geometry,
            InductionFlux::new(self.config.scheme.limiter),
            DensitizedRecovery,
            SerialExchange,
            self.boundaries(),
            initial,
            self.config.time.dt,
        )?
        .with_start_time(self.config.time.start_time);
        info!(
            "模拟已组装: {} 步 (t = {} → {})",
            self.config.num_steps(),
            self.config.time.start_time,
            self.config.time.final_time
        );
        Ok(stepper)
    }
}
