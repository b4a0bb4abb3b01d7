//! Concurrent invocations of one compiled endpoint must never mix requests.
//!
//! Every thread calls the same endpoint with its own arguments and body at
//! the same moment (released by a barrier). The recording transport keeps
//! each request it receives; each must carry exactly its caller's URI and
//! body.

use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use restwrap_core::{compile, Args, ApiConfig, Completion, HttpMethod, HttpRequest, Transport};

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<HttpRequest>>,
}

impl Transport for Recorder {
    type Handle = ();

    fn send(&self, request: HttpRequest, _done: Completion) {
        thread::yield_now();
        self.sent.lock().unwrap().push(request);
    }
}

const THREADS: usize = 16;
const CALLS_PER_THREAD: usize = 50;

#[test]
fn concurrent_calls_keep_their_own_uri_and_body() {
    let recorder = Arc::new(Recorder::default());
    let config = ApiConfig::new("http://api.test").endpoint(HttpMethod::Post, "comment", "/posts/${post}/comments?draft");
    let api = Arc::new(compile(&config, Arc::clone(&recorder)).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let api = Arc::clone(&api);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let comment = api.get("comment").unwrap().as_with_body().unwrap();
                barrier.wait();
                for i in 0..CALLS_PER_THREAD {
                    let args = Args::new().with("post", t).with("draft", i);
                    comment.call(&args, format!("{t}:{i}"), |_| {}).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let sent = recorder.sent.lock().unwrap();
    assert_eq!(sent.len(), THREADS * CALLS_PER_THREAD);
    for request in sent.iter() {
        let body = request.body.as_deref().unwrap();
        let (t, i) = body.split_once(':').unwrap();
        assert_eq!(request.uri, format!("http://api.test/posts/{t}/comments?draft={i}"));
        assert_eq!(request.method, HttpMethod::Post);
    }
}

#[test]
fn concurrent_requests_are_built_independently() {
    let recorder = Arc::new(Recorder::default());
    let config = ApiConfig::new("http://api.test").endpoint(HttpMethod::Get, "user", "/users/${id}");
    let api = Arc::new(compile(&config, Arc::clone(&recorder)).unwrap());

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                let user = api.get("user").unwrap().as_plain().unwrap();
                (t, user.request(&Args::from([("id", t)])).unwrap())
            })
        })
        .collect();

    for worker in workers {
        let (t, request) = worker.join().unwrap();
        assert_eq!(request.uri, format!("http://api.test/users/{t}"));
        assert!(request.body.is_none());
    }
    assert!(recorder.sent.lock().unwrap().is_empty());
}
