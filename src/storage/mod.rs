mod models;
mod postgres;
mod querier;
mod store;

pub use self::{
    models::{
        ArticleDetail, ArticleRow, AuthorRow, CommentDetail, CommentListItem, CredentialRow,
    },
    postgres::{DBPool, init_db_from_env, migrate},
    querier::Querier,
    store::{SqlxStore, Store},
};
