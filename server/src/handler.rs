use driver::database::SqliteDatabase;
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;
use vodca::References;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self::from(Handler::init().await?))
    }
}

impl From<Handler> for AppModule {
    fn from(handler: Handler) -> Self {
        Self(Arc::new(handler))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    sqlite: SqliteDatabase,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let sqlite = SqliteDatabase::new().await?;

        Ok(Self::new(sqlite))
    }

    pub fn new(sqlite: SqliteDatabase) -> Self {
        Self { sqlite }
    }
}
