use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use mdblog::{
    api,
    auth::TokenKeys,
    state::AppState,
    storage::{SqlxStore, Store, init_db_from_env, migrate},
};

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let db = init_db_from_env().await;

        migrate(&db, "sql/01-CREATE_TABLE.sql")
            .await
            .expect("初始化sql失败");

        let mut store = SqlxStore::new(db.clone());
        store.clean();
        store.commit().await.expect("清空数据失败");

        let app = AppState::new(db, TokenKeys::from_secret(b"test-secret"));

        let router = api::setup_route(app);

        Self { router }
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    async fn read_json(resp: Response<Body>) -> (StatusCode, Value) {
        let status = resp.status();
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        let json = serde_json::from_slice(&data).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::new(body.to_string()))
            .expect("请求失败");
        Self::read_json(self.request(req).await).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::new(body.to_string()))
            .expect("请求失败");
        Self::read_json(self.request(req).await).await
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let req = Request::get(path).body(Body::empty()).expect("请求失败");
        Self::read_json(self.request(req).await).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let req = Request::delete(path).body(Body::empty()).expect("请求失败");
        Self::read_json(self.request(req).await).await
    }

    /// 建一个作者并返回 id，文章用例的前置步骤
    async fn create_author(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .post("/articles/authors", json!({ "name": name, "email": email }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "创建作者失败: {}", body);
        body["id"].as_str().expect("作者缺少id").to_string()
    }
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_user_registration_and_login() {
    let app = TestApp::new().await;

    // 注册
    let (status, body) = app
        .post(
            "/users",
            json!({
                "name": "Ada",
                "email": "ada@x.com",
                "password": "secret123",
                "bio": "first programmer"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Ada");
    // 密码不回显
    assert!(!body.to_string().contains("secret123"));

    // 重复注册同一邮箱
    let (status, body) = app
        .post(
            "/users",
            json!({ "name": "Ada2", "email": "ada@x.com", "password": "other456" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["message"], "User already exists");

    // 错误密码
    let (status, body) = app
        .post(
            "/users/login",
            json!({ "email": "ada@x.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", body);
    assert_eq!(body["message"], "Incorrect password");

    // 未注册邮箱
    let (status, body) = app
        .post(
            "/users/login",
            json!({ "email": "nobody@x.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["message"], "Cannot find user");

    // 正确密码
    let (status, body) = app
        .post(
            "/users/login",
            json!({ "email": "ada@x.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Success");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_article_save_path() {
    let app = TestApp::new().await;
    let author = app.create_author("Bob", "bob@x.com").await;

    // 创建文章，保存路径派生 slug 和 sanitizedHtml
    let (status, body) = app
        .post(
            "/articles",
            json!({
                "title": "Hello World",
                "description": "d",
                "content": "# Hi",
                "author": author
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["slug"], "hello-world");
    assert!(
        body["sanitizedHtml"]
            .as_str()
            .is_some_and(|h| h.contains("<h1>Hi</h1>")),
        "{}",
        body
    );
    let id = body["id"].as_str().expect("文章缺少id").to_string();

    // 列表按创建时间倒序，作者已填充
    let (status, list) = app.get("/articles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["author"]["name"], "Bob");

    // 只改正文：slug 不变，HTML 重算
    let (status, body) = app
        .put(
            &format!("/articles/{}", id),
            json!({ "title": "Hello World", "description": "d", "content": "# Bye" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["slug"], "hello-world");
    assert!(
        body["sanitizedHtml"]
            .as_str()
            .is_some_and(|h| h.contains("Bye"))
    );

    // 只改标题：slug 重算
    let (status, body) = app
        .put(
            &format!("/articles/{}", id),
            json!({ "title": "Other Title", "description": "d", "content": "# Bye" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["slug"], "other-title");

    // 标题太短被拒绝，不产生部分写入
    let (status, body) = app
        .put(
            &format!("/articles/{}", id),
            json!({ "title": "ab", "description": "d", "content": "# Bye" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    let (_, body) = app.get(&format!("/articles/{}", id)).await;
    assert_eq!(body["title"], "Other Title");

    // 删除后获取返回 404
    let (status, body) = app.delete(&format!("/articles/{}", id)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Article deleted successfully");

    let (status, _) = app.get(&format!("/articles/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 再次删除重定向回列表
    let (status, _) = app.delete(&format!("/articles/{}", id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_comments() {
    let app = TestApp::new().await;
    let author = app.create_author("Cay", "cay@x.com").await;

    // 不存在的文章
    let (status, body) = app
        .post(
            "/articles/00000000-0000-0000-0000-000000000000/comments",
            json!({ "content": "hello?" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);
    assert_eq!(body["message"], "Article not found");

    let (_, body) = app
        .post(
            "/articles",
            json!({
                "title": "Commented Article",
                "description": "d",
                "content": "text",
                "author": author
            }),
        )
        .await;
    let id = body["id"].as_str().expect("文章缺少id").to_string();

    // 评论插入并追加到文章引用列表
    let (status, body) = app
        .post(
            &format!("/articles/{}/comments", id),
            json!({ "content": "first!", "author": author }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Comment added successfully");
    assert_eq!(body["comment"]["author"]["name"], "Cay");
    assert_eq!(body["article"]["comments"].as_array().map(Vec::len), Some(1));

    // 匿名评论，作者可选
    let (status, body) = app
        .post(
            &format!("/articles/{}/comments", id),
            json!({ "content": "second" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["comment"]["author"].is_null());

    // 平铺列表按创建时间倒序，文章已填充
    let (status, list) = app.get("/articles/comments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
    assert_eq!(list[0]["content"], "second");
    assert_eq!(list[0]["article"]["title"], "Commented Article");

    // 文章详情内评论按追加顺序排列
    let (_, body) = app.get(&format!("/articles/{}", id)).await;
    assert_eq!(body["comments"][0]["content"], "first!");
    assert_eq!(body["comments"][1]["content"], "second");
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_author_routes_not_captured_by_id() {
    let app = TestApp::new().await;
    app.create_author("Ann", "ann@x.com").await;
    app.create_author("Zed", "zed@x.com").await;

    // 固定子路径不能被 {id} 路由吞掉
    let (status, list) = app.get("/articles/authors").await;
    assert_eq!(status, StatusCode::OK, "{}", list);
    let names: Vec<_> = list
        .as_array()
        .expect("应为数组")
        .iter()
        .map(|a| a["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["Ann", "Zed"], "作者按姓名升序");

    // 无凭证作者不能登录
    let (status, body) = app
        .post(
            "/users/login",
            json!({ "email": "ann@x.com", "password": "anything" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", body);
}
