use crate::{PoolConfig, PoolError};
use microrpc_service::{Context, ContextError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Creates new connections on behalf of a [`ConnectionPool`].
#[async_trait::async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    type Connection: Send + 'static;

    async fn connect(&self) -> io::Result<Self::Connection>;
}

/// A point-in-time view of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Live connections, idle ones included.
    pub active: usize,
    pub idle: usize,
    /// Acquirers currently queued for a connection.
    pub waiting: usize,
}

/// What a queued acquirer receives.
enum Handoff<C> {
    /// A released connection, passed over without touching the idle queue.
    Connection(C),
    /// A freed slot; the receiver dials its own connection in it.
    Vacancy,
}

struct IdleConnection<C> {
    connection: C,
    last_active: Instant,
}

struct PoolState<C> {
    idle: VecDeque<IdleConnection<C>>,
    waiters: VecDeque<oneshot::Sender<Handoff<C>>>,
    active: usize,
    closed: bool,
}

impl<C> PoolState<C> {
    /// Offers `handoff` to waiters oldest first. Waiters that gave up are
    /// skipped; the handoff comes back if nobody took it.
    fn hand_to_waiter(&mut self, mut handoff: Handoff<C>) -> Option<Handoff<C>> {
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.send(handoff) {
                Ok(()) => return None,
                Err(returned) => handoff = returned,
            }
        }
        Some(handoff)
    }
}

struct PoolShared<F: ConnectionFactory> {
    factory: F,
    config: PoolConfig,
    state: Mutex<PoolState<F::Connection>>,
}

impl<F: ConnectionFactory> PoolShared<F> {
    /// Returns a healthy connection: to the oldest waiter, else to the idle
    /// queue, else closes it.
    fn release(&self, connection: F::Connection) {
        let surplus = {
            let mut state = self.state.lock();
            if state.closed {
                state.active -= 1;
                Some(connection)
            } else {
                match state.hand_to_waiter(Handoff::Connection(connection)) {
                    None => None,
                    Some(Handoff::Connection(connection))
                        if state.idle.len() < self.config.max_idle =>
                    {
                        state.idle.push_back(IdleConnection {
                            connection,
                            last_active: Instant::now(),
                        });
                        None
                    }
                    Some(Handoff::Connection(connection)) => {
                        state.active -= 1;
                        Some(connection)
                    }
                    Some(Handoff::Vacancy) => None,
                }
            }
        };

        if surplus.is_some() {
            tracing::debug!("closing surplus connection");
        }
    }

    /// Gives up one active slot without returning a connection, waking the
    /// oldest waiter to dial into it if there is one.
    fn release_slot(&self) {
        let mut state = self.state.lock();
        if state.closed || state.hand_to_waiter(Handoff::Vacancy).is_some() {
            state.active -= 1;
        }
    }
}

/// An active slot held by one caller. Dropping it while armed frees the slot.
struct Lease<F: ConnectionFactory> {
    shared: Arc<PoolShared<F>>,
    armed: bool,
}

impl<F: ConnectionFactory> Lease<F> {
    fn new(shared: Arc<PoolShared<F>>) -> Self {
        Lease {
            shared,
            armed: true,
        }
    }

    fn disarm(mut self) -> Arc<PoolShared<F>> {
        self.armed = false;
        self.shared.clone()
    }
}

impl<F: ConnectionFactory> Drop for Lease<F> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.release_slot();
        }
    }
}

/// A queued acquire. If dropped before its handoff is consumed, whatever
/// arrived late is routed back into the pool.
struct Waiter<F: ConnectionFactory> {
    shared: Arc<PoolShared<F>>,
    rx: Option<oneshot::Receiver<Handoff<F::Connection>>>,
}

impl<F: ConnectionFactory> Waiter<F> {
    /// `Ok(None)` means the pool dropped the queue, i.e. it was closed.
    async fn recv(
        mut self,
        ctx: &Context,
    ) -> Result<Option<Handoff<F::Connection>>, ContextError> {
        let Some(rx) = self.rx.as_mut() else {
            return Ok(None);
        };
        let received = ctx.run(rx).await?;
        self.rx = None;
        Ok(received.ok())
    }
}

impl<F: ConnectionFactory> Drop for Waiter<F> {
    fn drop(&mut self) {
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        rx.close();
        match rx.try_recv() {
            Ok(Handoff::Connection(connection)) => {
                tracing::trace!("returning connection handed to a cancelled waiter");
                self.shared.release(connection);
            }
            Ok(Handoff::Vacancy) => self.shared.release_slot(),
            Err(_) => {}
        }
    }
}

enum Step<F: ConnectionFactory> {
    Closed,
    Ready(F::Connection),
    Create,
    Wait(Waiter<F>),
}

/// A bounded pool of connections produced by a [`ConnectionFactory`].
///
/// At most `max_active` connections are alive at once. When the pool is
/// saturated, acquirers queue in FIFO order until a connection is released,
/// a slot frees up, or their context ends. Cloning yields another handle to
/// the same pool.
pub struct ConnectionPool<F: ConnectionFactory> {
    shared: Arc<PoolShared<F>>,
}

impl<F: ConnectionFactory> Clone for ConnectionPool<F> {
    fn clone(&self) -> Self {
        ConnectionPool {
            shared: self.shared.clone(),
        }
    }
}

impl<F: ConnectionFactory> ConnectionPool<F> {
    /// Validates `config` and dials `init_capacity` connections up front.
    pub async fn new(factory: F, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let mut idle = VecDeque::with_capacity(config.max_idle);
        for _ in 0..config.init_capacity {
            let connection = factory.connect().await.map_err(PoolError::Factory)?;
            idle.push_back(IdleConnection {
                connection,
                last_active: Instant::now(),
            });
        }

        tracing::debug!(
            init_capacity = config.init_capacity,
            max_active = config.max_active,
            max_idle = config.max_idle,
            "created connection pool"
        );

        let state = PoolState {
            active: idle.len(),
            idle,
            waiters: VecDeque::new(),
            closed: false,
        };

        Ok(ConnectionPool {
            shared: Arc::new(PoolShared {
                factory,
                config,
                state: Mutex::new(state),
            }),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Takes a connection, dialing or queueing as needed.
    ///
    /// Expired idle connections are closed and skipped. Factory errors are
    /// returned as-is. If `ctx` ends while queued, the acquire fails with the
    /// context error and a connection handed over in the meantime goes back
    /// to the pool.
    pub async fn acquire(&self, ctx: &Context) -> Result<PooledConnection<F>, PoolError> {
        loop {
            if let Some(err) = ctx.err() {
                return Err(err.into());
            }

            let (step, expired) = self.next_step();
            if !expired.is_empty() {
                tracing::debug!(count = expired.len(), "evicted expired idle connections");
            }
            drop(expired);

            match step {
                Step::Closed => return Err(PoolError::Closed),
                Step::Ready(connection) => return Ok(self.lease(connection)),
                Step::Create => return self.create(ctx, Lease::new(self.shared.clone())).await,
                Step::Wait(waiter) => match waiter.recv(ctx).await? {
                    Some(Handoff::Connection(connection)) => return Ok(self.lease(connection)),
                    Some(Handoff::Vacancy) => {
                        return self.create(ctx, Lease::new(self.shared.clone())).await;
                    }
                    None => continue,
                },
            }
        }
    }

    /// Closes idle connections and fails queued and future acquires with
    /// [`PoolError::Closed`]. Connections still held are closed on release.
    pub fn close(&self) {
        let (idle, waiters) = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            let idle = std::mem::take(&mut state.idle);
            state.active -= idle.len();
            (idle, std::mem::take(&mut state.waiters))
        };

        tracing::debug!(
            idle = idle.len(),
            waiting = waiters.len(),
            "closed connection pool"
        );
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock();
        PoolStats {
            active: state.active,
            idle: state.idle.len(),
            waiting: state.waiters.iter().filter(|w| !w.is_closed()).count(),
        }
    }

    /// Decides under the lock what the current acquire attempt does next.
    /// Expired idle connections are returned so they close outside the lock.
    fn next_step(&self) -> (Step<F>, Vec<F::Connection>) {
        let mut state = self.shared.state.lock();
        let mut expired = Vec::new();

        if state.closed {
            return (Step::Closed, expired);
        }

        while let Some(idle) = state.idle.pop_front() {
            if idle.last_active.elapsed() > self.shared.config.max_idle_time {
                state.active -= 1;
                expired.push(idle.connection);
                continue;
            }
            return (Step::Ready(idle.connection), expired);
        }

        if state.active < self.shared.config.max_active {
            state.active += 1;
            return (Step::Create, expired);
        }

        // Acquirers that gave up leave closed senders behind.
        state.waiters.retain(|waiter| !waiter.is_closed());

        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        (
            Step::Wait(Waiter {
                shared: self.shared.clone(),
                rx: Some(rx),
            }),
            expired,
        )
    }

    /// Dials into an already reserved slot. The slot is freed if dialing
    /// fails or `ctx` ends first.
    async fn create(
        &self,
        ctx: &Context,
        lease: Lease<F>,
    ) -> Result<PooledConnection<F>, PoolError> {
        let connection = ctx
            .run(self.shared.factory.connect())
            .await?
            .map_err(PoolError::Factory)?;

        tracing::debug!("created pooled connection");

        Ok(PooledConnection { connection, lease })
    }

    fn lease(&self, connection: F::Connection) -> PooledConnection<F> {
        PooledConnection {
            connection,
            lease: Lease::new(self.shared.clone()),
        }
    }
}

/// A connection on loan from a [`ConnectionPool`].
///
/// Call [`PooledConnection::release`] after a clean exchange so the
/// connection can be reused. Dropping the guard, or calling
/// [`PooledConnection::discard`], closes the connection and frees its slot.
pub struct PooledConnection<F: ConnectionFactory> {
    connection: F::Connection,
    lease: Lease<F>,
}

impl<F: ConnectionFactory> PooledConnection<F> {
    pub fn release(self) {
        let PooledConnection { connection, lease } = self;
        lease.disarm().release(connection);
    }

    pub fn discard(self) {
        tracing::debug!("discarding pooled connection");
        drop(self);
    }
}

impl<F: ConnectionFactory> Deref for PooledConnection<F> {
    type Target = F::Connection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl<F: ConnectionFactory> DerefMut for PooledConnection<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
