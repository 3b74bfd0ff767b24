//! 取得ゲート
//!
//! ダイアログやタブのデータ取得を状態機械で表す。
//!
//! ```text
//! Closed ──open()──▶ Loading ──resolve(Ok)──▶ Loaded
//!    ▲                  │  └───resolve(Err)──▶ Failed
//!    └────close()───────┴──────────────────────────┘
//! ```
//!
//! `open()` のたびに世代が進み、返された `Ticket` が現在の世代と
//! 一致しないレスポンスは捨てる。`close()` も世代を進めるので、
//! 閉じた後に届いたレスポンスは反映されない。

use crate::error::Error;

/// リクエストの発行番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// ゲートの状態
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Closed,
    Loading,
    Loaded(T),
    /// 失敗。直前に取得できていたデータがあれば `stale` に残す
    Failed { message: String, stale: Option<T> },
}

#[derive(Debug, Clone)]
pub struct FetchGate<T> {
    state: FetchState<T>,
    generation: u64,
    last_good: Option<T>,
}

impl<T> Default for FetchGate<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Closed,
            generation: 0,
            last_good: None,
        }
    }
}

impl<T> FetchGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得を開始する（Loading へ）
    pub fn open(&mut self) -> Ticket {
        self.generation += 1;
        match std::mem::replace(&mut self.state, FetchState::Loading) {
            FetchState::Loaded(data) => self.last_good = Some(data),
            FetchState::Failed { stale: Some(data), .. } => self.last_good = Some(data),
            _ => {}
        }
        Ticket(self.generation)
    }

    /// レスポンスを反映する。古いチケットなら捨てて false
    pub fn resolve(&mut self, ticket: Ticket, result: Result<T, Error>) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding stale response"
            );
            return false;
        }
        self.state = match result {
            Ok(data) => {
                self.last_good = None;
                FetchState::Loaded(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed");
                FetchState::Failed {
                    message: e.banner_message(),
                    stale: self.last_good.take(),
                }
            }
        };
        true
    }

    /// 閉じる。データも保持しない
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = FetchState::Closed;
        self.last_good = None;
    }

    /// このチケットのレスポンスを受け付けるか
    pub fn accepts(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation && matches!(self.state, FetchState::Loading)
    }

    /// 今の世代のチケット（取得後に始めた処理の照合用）
    pub fn current(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// 閉じたり開き直したりしていなければ true
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation && self.is_open()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FetchState::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// 表示できるデータ（読み込み中・閉じている間は None）
    pub fn data(&self) -> Option<&T> {
        match &self.state {
            FetchState::Loaded(data) => Some(data),
            FetchState::Failed { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}
