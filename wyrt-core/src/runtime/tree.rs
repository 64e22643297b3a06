//! 分块多路搜索树
//!
//! Set 与 Map 共用的有序集合引擎。每个块（chunk）包含：
//! - 分支区：有序的 `(子块, 条目)` 对，子块 i 中的条目都位于条目 i-1 与条目 i 之间
//! - 叶子区：有序条目，全部大于分支区的所有条目
//!
//! 容量以原始槽位计量：Set 块 8 槽（分支 2 槽、叶子 1 槽），
//! Map 块 24 槽（分支 3 槽、叶子 2 槽）。
//!
//! 只支持插入/更新与点查找，块从不合并或释放。
//! 块满时分裂：把较大的一半下移到新块，新块挂在一个提升出来的条目下，树只会变深。

use super::compare::{comparator, Comparator};
use crate::object::{RuntimeError, TypeTag, Value};
use serde::Serialize;
use std::cmp::Ordering;

/// 条目形状
pub trait EntryShape: Sized {
    /// 块的总槽位数
    const CHUNK_SLOTS: usize;
    /// 一个分支对占用的槽位
    const BRANCH_SLOTS: usize;
    /// 一个叶子条目占用的槽位
    const LEAF_SLOTS: usize;

    /// 参与排序的值（Set 是值本身，Map 是键）
    fn key(&self) -> &Value;

    /// 遇到相等的已有条目时调用，`incoming` 是新条目
    fn absorb(&mut self, incoming: Self);
}

/// 分裂方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    /// 分支区较大：所有分支下移
    Branches,
    /// 叶子区较大：所有叶子下移，最大者提升为分支
    Leaves,
}

/// 一次插入的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新增了一个条目
    Added {
        /// 目标块的深度（根为 0）
        depth: usize,
        /// 在目标块叶子区中的插入位置
        index: usize,
        split: Option<SplitKind>,
    },
    /// 键已存在（Set 无操作，Map 替换值）
    Merged,
}

/// 树的统计信息
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub entries: usize,
    pub chunks: usize,
    /// 层数，只有根块时为 1
    pub depth: usize,
    pub splits: usize,
}

/// 重平衡钩子收到的提示
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalanceHint {
    pub depth: usize,
    pub index: usize,
}

// ===== Chunk =====

pub struct Chunk<E> {
    branches: Vec<(Box<Chunk<E>>, E)>,
    leaves: Vec<E>,
}

impl<E: EntryShape> Chunk<E> {
    fn new() -> Self {
        Chunk {
            branches: Vec::new(),
            leaves: Vec::new(),
        }
    }

    fn used_slots(&self) -> usize {
        self.branches.len() * E::BRANCH_SLOTS + self.leaves.len() * E::LEAF_SLOTS
    }

    fn has_room(&self) -> bool {
        self.used_slots() + E::LEAF_SLOTS <= E::CHUNK_SLOTS
    }

    /// 在分支区中定位 `key`
    fn probe_branches(&self, key: &Value, compare: Comparator) -> Result<Probe, RuntimeError> {
        for (i, (_, entry)) in self.branches.iter().enumerate() {
            match compare(key, entry.key())? {
                Ordering::Equal => return Ok(Probe::Equal(i)),
                Ordering::Less => return Ok(Probe::Descend(i)),
                Ordering::Greater => {}
            }
        }
        Ok(Probe::Past)
    }

    /// 在叶子区中定位 `key`：相等位置或有序插入位置
    fn probe_leaves(&self, key: &Value, compare: Comparator) -> Result<Slot, RuntimeError> {
        for (i, entry) in self.leaves.iter().enumerate() {
            match compare(key, entry.key())? {
                Ordering::Equal => return Ok(Slot::Occupied(i)),
                Ordering::Less => return Ok(Slot::Vacant(i)),
                Ordering::Greater => {}
            }
        }
        Ok(Slot::Vacant(self.leaves.len()))
    }

    /// 块已满，插入 `entry`（有序位置 `index`）时分裂
    fn split(&mut self, index: usize, entry: E) -> SplitKind {
        let mut lower = Chunk::new();

        if self.branches.len() * E::BRANCH_SLOTS > E::CHUNK_SLOTS / 2 {
            // 分支全部下移，叶子加新条目中最小的一个成为唯一的分支
            lower.branches = std::mem::take(&mut self.branches);
            self.leaves.insert(index, entry);
            let smallest = self.leaves.remove(0);
            self.branches.push((Box::new(lower), smallest));
            SplitKind::Branches
        } else {
            // 叶子全部下移，最大的一个提升为新分支追加到末尾
            let mut moved = std::mem::take(&mut self.leaves);
            moved.insert(index, entry);
            if let Some(largest) = moved.pop() {
                lower.leaves = moved;
                self.branches.push((Box::new(lower), largest));
            }
            SplitKind::Leaves
        }
    }

    /// 按序遍历：子块、分支条目交替，最后是叶子
    ///
    /// 深度随条目数线性增长，所以用显式栈而不是递归。
    /// 帧 `(chunk, next)` 表示前 `next` 个子块已经走完。
    fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a E)) {
        let mut frames: Vec<(&'a Chunk<E>, usize)> = vec![(self, 0)];
        while let Some((chunk, next)) = frames.pop() {
            if next > 0 {
                f(&chunk.branches[next - 1].1);
            }
            match chunk.branches.get(next) {
                Some((child, _)) => {
                    frames.push((chunk, next + 1));
                    frames.push((&**child, 0));
                }
                None => chunk.leaves.iter().for_each(&mut *f),
            }
        }
    }

    fn collect_stats(&self, stats: &mut TreeStats) {
        let mut pending: Vec<(&Chunk<E>, usize)> = vec![(self, 1)];
        while let Some((chunk, level)) = pending.pop() {
            stats.chunks += 1;
            stats.depth = stats.depth.max(level);
            stats.entries += chunk.branches.len() + chunk.leaves.len();
            pending.extend(chunk.branches.iter().map(|(child, _)| (&**child, level + 1)));
        }
    }
}

impl<E> Drop for Chunk<E> {
    fn drop(&mut self) {
        // 子块逐个摘下再释放，释放时它们的分支区已经是空的
        let mut pending: Vec<Box<Chunk<E>>> =
            self.branches.drain(..).map(|(child, _)| child).collect();
        while let Some(mut chunk) = pending.pop() {
            pending.extend(chunk.branches.drain(..).map(|(child, _)| child));
        }
    }
}

enum Probe {
    Equal(usize),
    Descend(usize),
    Past,
}

enum Slot {
    Occupied(usize),
    Vacant(usize),
}

// ===== SearchTree =====

/// 一个 Set 或 Map 的完整树
pub struct SearchTree<E> {
    /// 元素（键）类型，首次插入时固定
    element_type: Option<TypeTag>,
    /// 存活条目数，插入时增量维护
    size: usize,
    root: Chunk<E>,
    splits: usize,
    last_hint: Option<RebalanceHint>,
}

impl<E: EntryShape> SearchTree<E> {
    /// `TypeTag::None` 表示元素类型未定
    pub fn new(element_type: TypeTag) -> Self {
        SearchTree {
            element_type: (element_type != TypeTag::None).then_some(element_type),
            size: 0,
            root: Chunk::new(),
            splits: 0,
            last_hint: None,
        }
    }

    pub fn element_type(&self) -> Option<TypeTag> {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 最近一次插入交给重平衡钩子的提示
    pub fn last_hint(&self) -> Option<RebalanceHint> {
        self.last_hint
    }

    /// 检查元素类型并取得比较器，不修改任何状态
    fn resolve(&self, tag: TypeTag) -> Result<Comparator, RuntimeError> {
        match self.element_type {
            Some(expected) if expected != tag => Err(RuntimeError::ElementTypeMismatch {
                expected,
                found: tag,
            }),
            Some(expected) => comparator(expected),
            None => comparator(tag),
        }
    }

    /// 插入或合并一个条目
    ///
    /// 所有比较在结构修改之前完成，出错时树保持原样。
    pub fn insert(&mut self, entry: E) -> Result<InsertOutcome, RuntimeError> {
        let tag = entry.key().tag();
        let compare = self.resolve(tag)?;

        if self.size == 0 {
            self.root.leaves.push(entry);
            return Ok(self.added(tag, 0, 0, None));
        }

        let mut chunk = &mut self.root;
        let mut depth = 0;
        loop {
            match chunk.probe_branches(entry.key(), compare)? {
                Probe::Equal(i) => {
                    chunk.branches[i].1.absorb(entry);
                    return Ok(InsertOutcome::Merged);
                }
                Probe::Descend(i) => {
                    chunk = &mut *chunk.branches[i].0;
                    depth += 1;
                }
                Probe::Past => break,
            }
        }

        let index = match chunk.probe_leaves(entry.key(), compare)? {
            Slot::Occupied(i) => {
                chunk.leaves[i].absorb(entry);
                return Ok(InsertOutcome::Merged);
            }
            Slot::Vacant(i) => i,
        };

        let split = if chunk.has_room() {
            chunk.leaves.insert(index, entry);
            None
        } else {
            Some(chunk.split(index, entry))
        };
        if split.is_some() {
            self.splits += 1;
        }
        Ok(self.added(tag, depth, index, split))
    }

    fn added(
        &mut self,
        tag: TypeTag,
        depth: usize,
        index: usize,
        split: Option<SplitKind>,
    ) -> InsertOutcome {
        self.size += 1;
        if self.element_type.is_none() {
            self.element_type = Some(tag);
        }
        self.rebalance(RebalanceHint { depth, index });
        InsertOutcome::Added {
            depth,
            index,
            split,
        }
    }

    /// 重平衡钩子
    ///
    /// 不做任何结构调整：树的形状完全由分裂规则决定，深度只受条目数限制。
    /// 这里只记录提示供诊断使用。
    fn rebalance(&mut self, hint: RebalanceHint) {
        self.last_hint = Some(hint);
    }

    /// 只读查找，与插入使用相同的下降路径
    pub fn find(&self, key: &Value) -> Result<Option<&E>, RuntimeError> {
        if self.size == 0 {
            return Ok(None);
        }
        let compare = self.resolve(key.tag())?;

        let mut chunk = &self.root;
        loop {
            match chunk.probe_branches(key, compare)? {
                Probe::Equal(i) => return Ok(Some(&chunk.branches[i].1)),
                Probe::Descend(i) => chunk = &*chunk.branches[i].0,
                Probe::Past => break,
            }
        }
        match chunk.probe_leaves(key, compare)? {
            Slot::Occupied(i) => Ok(Some(&chunk.leaves[i])),
            Slot::Vacant(_) => Ok(None),
        }
    }

    /// 中序遍历：左子树、条目、……、叶子区
    pub fn for_each<'a>(&'a self, mut f: impl FnMut(&'a E)) {
        self.root.for_each(&mut f);
    }

    pub fn entries(&self) -> Vec<&E> {
        let mut out = Vec::with_capacity(self.size);
        self.for_each(|entry| out.push(entry));
        out
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            splits: self.splits,
            ..TreeStats::default()
        };
        self.root.collect_stats(&mut stats);
        stats
    }
}
