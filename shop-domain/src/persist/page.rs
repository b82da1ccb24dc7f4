use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// 排序方向（按下单时间）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// 分页请求：页码（从 0 开始）、页大小与排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: usize,
    size: usize,
    direction: Direction,
}

/// 反序列化时的原始形态，经 `PageRequest::new` 校验后才成为分页请求
#[derive(Deserialize)]
struct RawPageRequest {
    page: usize,
    size: usize,
    #[serde(default)]
    direction: Direction,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = DomainError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.page, raw.size)?.with_direction(raw.direction))
    }
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> DomainResult<Self> {
        if size == 0 {
            return Err(DomainError::invalid_argument("page size must be > 0"));
        }
        Ok(Self {
            page,
            size,
            direction: Direction::default(),
        })
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// 将页大小限制在 `max` 以内（`max` 为 0 时按 1 处理）
    pub fn clamp_size(mut self, max: usize) -> Self {
        self.size = self.size.min(max.max(1));
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 本页首条记录的偏移量
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// 分页结果：本页内容、原始分页请求与总条数
///
/// 调用方据此计算总页数与翻页导航，无需再次查询。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    content: Vec<T>,
    pageable: PageRequest,
    total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            pageable,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn pageable(&self) -> &PageRequest {
        &self.pageable
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn number(&self) -> usize {
        self.pageable.page()
    }

    pub fn total_pages(&self) -> u64 {
        match self.pageable.size() as u64 {
            0 => 0,
            size => self.total_elements.div_ceil(size),
        }
    }

    pub fn is_first(&self) -> bool {
        self.pageable.page() == 0
    }

    pub fn has_previous(&self) -> bool {
        self.pageable.page() > 0
    }

    pub fn has_next(&self) -> bool {
        (self.pageable.page() as u64 + 1) < self.total_pages()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total_elements: self.total_elements,
        }
    }
}
