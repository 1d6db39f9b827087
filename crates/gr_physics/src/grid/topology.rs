// crates/gr_physics/src/grid/topology.rs

//! 进程拓扑
//!
//! 显式传入的分区上下文（进程号、通信句柄、本地区块范围），
//! 取代隐式的全局通信器。单进程运行使用 [`ProcessTopology::serial`]。

use gr_config::Face;
use gr_foundation::{GrError, GrResult};

/// 不透明通信句柄
///
/// 数值由外部通信层解释（例如 MPI communicator 的整数表示），本 crate 只负责传递。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommHandle(u64);

impl CommHandle {
    /// 单进程自身通信器
    pub const SELF: CommHandle = CommHandle(0);

    /// 由原始值创建
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 原始值
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// 进程拓扑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTopology {
    rank: usize,
    size: usize,
    comm: CommHandle,
    global_size: [usize; 3],
    local_offset: [usize; 3],
    local_size: [usize; 3],
}

impl ProcessTopology {
    /// 单进程拓扑：本地区块即全局区块
    pub fn serial(global_size: [usize; 3]) -> Self {
        Self {
            rank: 0,
            size: 1,
            comm: CommHandle::SELF,
            global_size,
            local_offset: [0; 3],
            local_size: global_size,
        }
    }

    /// 创建分布式拓扑
    pub fn new(
        rank: usize,
        size: usize,
        comm: CommHandle,
        global_size: [usize; 3],
        local_offset: [usize; 3],
        local_size: [usize; 3],
    ) -> GrResult<Self> {
        if size == 0 || rank >= size {
            return Err(GrError::invalid_grid(format!(
                "进程号 {} 超出进程数 {}",
                rank, size
            )));
        }
        for axis in 0..3 {
            if local_size[axis] == 0 || local_offset[axis] + local_size[axis] > global_size[axis] {
                return Err(GrError::invalid_grid(format!(
                    "X{} 方向本地区块 [{}, {}) 超出全局范围 {}",
                    axis + 1,
                    local_offset[axis],
                    local_offset[axis] + local_size[axis],
                    global_size[axis]
                )));
            }
        }
        Ok(Self {
            rank,
            size,
            comm,
            global_size,
            local_offset,
            local_size,
        })
    }

    /// 进程号
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// 进程数
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 通信句柄
    #[inline]
    pub fn comm(&self) -> CommHandle {
        self.comm
    }

    /// 全局网格数
    #[inline]
    pub fn global_size(&self) -> [usize; 3] {
        self.global_size
    }

    /// 本地区块在全局中的偏移
    #[inline]
    pub fn local_offset(&self) -> [usize; 3] {
        self.local_offset
    }

    /// 本地区块大小
    #[inline]
    pub fn local_size(&self) -> [usize; 3] {
        self.local_size
    }

    /// 是否单进程
    #[inline]
    pub fn is_serial(&self) -> bool {
        self.size == 1
    }

    /// 本地区块是否覆盖整个轴
    #[inline]
    pub fn spans_axis(&self, axis: usize) -> bool {
        self.local_offset[axis] == 0 && self.local_size[axis] == self.global_size[axis]
    }

    /// 该面是否位于全局计算域边缘
    pub fn on_domain_edge(&self, face: Face) -> bool {
        let axis = face.axis();
        if face.is_upper() {
            self.local_offset[axis] + self.local_size[axis] == self.global_size[axis]
        } else {
            self.local_offset[axis] == 0
        }
    }
}
