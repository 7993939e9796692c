//! DOM ノードを保持するアリーナ
//!
//! # 概要
//! 固定バイト容量とオフセットを持つバンプ型アロケータです。
//! ノードは個別に解放されず、`reset()` でまとめて破棄されます。
//!
//! ポインタの代わりに `ArenaId`（インデックス + 世代）を払い出すため、
//! `reset()` 以前に発行された ID は世代不一致で必ず `None` になります。
//! `reset()` は `self` を消費するので、参照を保持したままのリセットはコンパイルエラーになります。

use std::fmt;
use std::mem::{align_of, size_of};

/// アリーナ内のスロットを指すハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId {
    index: u32,
    generation: u32,
}

impl ArenaId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// 容量超過。部分確保やリサイズは行わない
    OutOfMemory {
        requested: usize,
        capacity: usize,
        used: usize,
    },
    /// 過去の世代の ID でアクセスした
    StaleHandle(ArenaId),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                capacity,
                used,
            } => write!(
                f,
                "arena out of memory: requested {requested} bytes, {used}/{capacity} bytes used"
            ),
            Self::StaleHandle(id) => write!(f, "stale arena handle {id}"),
        }
    }
}

impl std::error::Error for ArenaError {}

/// 固定容量のバンプアロケータ
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<T>,
    capacity: usize,
    offset: usize,
    generation: u32,
}

impl<T> Arena<T> {
    /// `capacity` バイトの予算を持つアリーナを作成
    pub fn with_capacity(capacity: usize) -> Self {
        let per_slot = size_of::<T>().max(1);
        Self {
            slots: Vec::with_capacity((capacity / per_slot).min(1024)),
            capacity,
            offset: 0,
            generation: 0,
        }
    }

    /// 値を確保して ID を返す。
    /// オフセットは `align_of::<T>()` に切り上げてから `size_of::<T>()` 進める。
    pub fn alloc(&mut self, value: T) -> Result<ArenaId, ArenaError> {
        let size = size_of::<T>().max(1);
        let start = self.offset.next_multiple_of(align_of::<T>());
        let end = start
            .checked_add(size)
            .filter(|end| *end <= self.capacity)
            .ok_or(ArenaError::OutOfMemory {
                requested: size,
                capacity: self.capacity,
                used: self.offset,
            })?;

        self.offset = end;
        let id = ArenaId {
            index: self.slots.len() as u32,
            generation: self.generation,
        };
        self.slots.push(value);
        Ok(id)
    }

    pub fn get(&self, id: ArenaId) -> Option<&T> {
        if id.generation != self.generation {
            return None;
        }
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: ArenaId) -> Option<&mut T> {
        if id.generation != self.generation {
            return None;
        }
        self.slots.get_mut(id.index())
    }

    /// `get` のエラー版
    pub fn try_get(&self, id: ArenaId) -> Result<&T, ArenaError> {
        self.get(id).ok_or(ArenaError::StaleHandle(id))
    }

    pub fn contains(&self, id: ArenaId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// バイト容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 使用済みバイト数
    pub fn used(&self) -> usize {
        self.offset
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArenaId, &T)> {
        let generation = self.generation;
        self.slots.iter().enumerate().map(move |(i, v)| {
            (
                ArenaId {
                    index: i as u32,
                    generation,
                },
                v,
            )
        })
    }

    /// 全スロットをその場で破棄し、オフセットを 0 に戻す。
    /// 世代が進むため、以前の ID はすべて無効になる。
    pub fn reset(mut self) -> Self {
        log::debug!(target: "Arena", "reset: dropping {} slots ({} bytes)", self.slots.len(), self.offset);
        self.slots.clear();
        self.offset = 0;
        self.generation = self.generation.wrapping_add(1);
        self
    }
}
