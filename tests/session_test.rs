// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/session_test.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file drives whole sessions over in-memory pipes, located in the tests
// directory. The clock is paused so job cadence, the authorize delay and the
// reconnect grace period run instantly and in a fixed order.
//
// Tree Location:
// - tests/session_test.rs (session scenarios)
// - Depends on: sv1-mock-pool, tokio, serde_json

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use sv1_mock_pool::core::{Personality, ReconnectDirective};
    use std::time::Duration;
    use sv1_mock_pool::pool::{CloseReason, MAX_FRAME_LENGTH, Session};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    struct Miner {
        lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
        writer: WriteHalf<DuplexStream>,
        session: JoinHandle<CloseReason>,
    }

    impl Miner {
        fn connect(personality: Personality) -> Self {
            let (miner, pool) = tokio::io::duplex(64 * 1024);
            let (pool_read, pool_write) = tokio::io::split(pool);
            let session = Session::new(0, "miner".to_string(), personality, ReconnectDirective::default(), pool_write);
            let session = tokio::spawn(session.run(pool_read));

            let (miner_read, writer) = tokio::io::split(miner);
            Self {
                lines: BufReader::new(miner_read).lines(),
                writer,
                session,
            }
        }

        async fn send(&mut self, line: &str) {
            self.writer.write_all(line.as_bytes()).await.unwrap();
            self.writer.write_all(b"\n").await.unwrap();
        }

        async fn next_frame(&mut self) -> Option<Value> {
            let line = self.lines.next_line().await.unwrap()?;
            Some(serde_json::from_str(&line).expect("pool sent invalid JSON"))
        }

        async fn expect_frame(&mut self) -> Value {
            self.next_frame().await.expect("connection closed early")
        }

        /// Skip notifications until a response arrives
        async fn next_response(&mut self) -> Value {
            loop {
                let frame = self.expect_frame().await;
                if frame.get("result").is_some() {
                    return frame;
                }
            }
        }

        async fn handshake(&mut self) {
            self.send(r#"{"id":1,"method":"mining.subscribe","params":["bitaxe/2.4"]}"#).await;
            self.expect_frame().await;
            self.send(r#"{"id":2,"method":"mining.authorize","params":["worker.1","x"]}"#).await;
            self.expect_frame().await;
            self.expect_frame().await;
            self.send(r#"{"id":3,"method":"mining.extranonce.subscribe","params":[]}"#).await;
            assert_eq!(self.expect_frame().await["result"], json!(true));
        }
    }

    fn is_notify(frame: &Value) -> bool {
        frame["method"] == "mining.notify"
    }

    /// Every gap between consecutive notifies matches the job interval
    fn assert_cadence(arrivals: &[Instant], interval: Duration) {
        assert!(arrivals.len() >= 2, "need at least two jobs to measure cadence");
        for pair in arrivals.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= interval && gap < interval + Duration::from_millis(50),
                "job gap {:?} does not match interval {:?}",
                gap,
                interval
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_nicehash_handshake_rotation_and_reconnect() {
        let mut miner = Miner::connect(Personality::nicehash());

        miner.send(r#"{"id":1,"method":"mining.subscribe","params":["bitaxe/2.4"]}"#).await;
        let subscribe = miner.expect_frame().await;
        assert_eq!(subscribe["id"], 1);
        assert_eq!(subscribe["error"], Value::Null);
        assert_eq!(subscribe["result"][0][0][0], "mining.set_difficulty");
        assert_eq!(subscribe["result"][0][1][0], "mining.notify");
        assert_eq!(subscribe["result"][1], "deadbeefcafebabe");
        assert_eq!(subscribe["result"][2], 8);

        miner.send(r#"{"id":2,"method":"mining.authorize","params":["worker.1","x"]}"#).await;
        assert_eq!(miner.expect_frame().await, json!({"id": 2, "result": true, "error": null}));
        let difficulty = miner.expect_frame().await;
        assert_eq!(difficulty["method"], "mining.set_difficulty");
        assert_eq!(difficulty["params"], json!([300]));

        miner.send(r#"{"id":3,"method":"mining.extranonce.subscribe","params":[]}"#).await;
        assert_eq!(miner.expect_frame().await["result"], json!(true));
        let announce = miner.expect_frame().await;
        assert_eq!(announce["method"], "mining.set_extranonce");
        assert_eq!(announce["params"], json!(["deadbeefcafebabe", 8]));

        let mut job_ids = Vec::new();
        let mut arrivals = Vec::new();
        let mut rotated_before = None;
        loop {
            let frame = miner.expect_frame().await;
            match frame["method"].as_str() {
                Some("mining.notify") => {
                    arrivals.push(Instant::now());
                    let params = frame["params"].as_array().unwrap();
                    assert_eq!(params.len(), 9, "notify carries nine params");
                    assert_eq!(params[7].as_str().unwrap().len(), 8, "ntime is 8 hex digits");
                    assert_eq!(params[8], json!(true));
                    job_ids.push(params[0].as_str().unwrap().to_string());
                }
                Some("mining.set_extranonce") => {
                    let en1 = frame["params"][0].as_str().unwrap();
                    assert_eq!(en1.len(), 16);
                    assert!(en1.chars().all(|c| c.is_ascii_hexdigit()));
                    rotated_before = Some(job_ids.len() + 1);
                }
                Some("client.reconnect") => {
                    assert_eq!(frame["id"], Value::Null);
                    assert_eq!(frame["params"], json!(["stratum.example.com", 3333, 5]));
                    break;
                }
                other => panic!("unexpected frame {:?}", other),
            }
        }

        assert_eq!(job_ids, vec!["0001", "0002", "0003", "0004", "0005"]);
        assert_eq!(rotated_before, Some(5), "rotation precedes the fourth periodic job");
        assert_cadence(&arrivals, Duration::from_secs(3));
        assert_eq!(Personality::nicehash().job_interval, Duration::from_secs(3));
        assert!(miner.next_frame().await.is_none(), "nothing follows the reconnect directive");
        assert_eq!(miner.session.await.unwrap(), CloseReason::SchedulerReconnect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mrr_handshake_has_no_extranonce_updates() {
        let mut miner = Miner::connect(Personality::mrr());

        miner.send(r#"{"id":1,"method":"mining.subscribe","params":[]}"#).await;
        let subscribe = miner.expect_frame().await;
        assert_eq!(subscribe["result"][1], "8000845a");
        assert_eq!(subscribe["result"][2], 4);

        miner.send(r#"{"id":2,"method":"mining.authorize","params":["worker.1","x"]}"#).await;
        miner.expect_frame().await;
        assert_eq!(miner.expect_frame().await["params"], json!([65536]));

        miner.send(r#"{"id":3,"method":"mining.extranonce.subscribe","params":[]}"#).await;
        assert_eq!(miner.expect_frame().await["result"], json!(true));

        let mut frames = Vec::new();
        let mut arrivals = Vec::new();
        while let Some(frame) = miner.next_frame().await {
            if is_notify(&frame) {
                arrivals.push(Instant::now());
            }
            frames.push(frame);
        }
        assert_cadence(&arrivals, Duration::from_secs(10));
        assert_eq!(Personality::mrr().job_interval, Duration::from_secs(10));
        let methods: Vec<&str> = frames.iter().map(|f| f["method"].as_str().unwrap()).collect();
        assert_eq!(
            methods,
            vec![
                "mining.notify",
                "mining.notify",
                "mining.notify",
                "mining.notify",
                "mining.notify",
                "client.reconnect"
            ]
        );
        let ids: Vec<u64> = frames
            .iter()
            .filter(|f| is_notify(f))
            .map(|f| u64::from_str_radix(f["params"][0].as_str().unwrap(), 16).unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "job ids strictly increase");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_validation() {
        let mut miner = Miner::connect(Personality::mrr());

        miner.send(r#"{"id":10,"method":"mining.submit","params":["worker","ffff"]}"#).await;
        assert_eq!(
            miner.next_response().await,
            json!({"id": 10, "result": null, "error": [21, "Unknown job ID", null]})
        );

        miner.handshake().await;
        let first_job = miner.expect_frame().await;
        assert!(is_notify(&first_job));
        assert_eq!(first_job["params"][0], "0001");

        miner
            .send(r#"{"id":11,"method":"mining.submit","params":["worker","0001","00000000","6553f100","deadbeef"]}"#)
            .await;
        assert_eq!(miner.next_response().await, json!({"id": 11, "result": true, "error": null}));

        miner.send(r#"{"id":12,"method":"mining.submit","params":["worker","ffff"]}"#).await;
        assert_eq!(miner.next_response().await["error"], json!([21, "Unknown job ID", null]));

        miner.send(r#"{"id":13,"method":"mining.submit","params":["worker"]}"#).await;
        assert_eq!(miner.next_response().await["error"], json!([20, "Invalid submit format", null]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_jobs_stay_valid() {
        let mut miner = Miner::connect(Personality::mrr());
        miner.handshake().await;
        for _ in 0..2 {
            assert!(is_notify(&miner.expect_frame().await));
        }

        miner.send(r#"{"id":20,"method":"mining.submit","params":["worker","0001"]}"#).await;
        assert_eq!(miner.next_response().await["result"], json!(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_state_requests() {
        let mut miner = Miner::connect(Personality::nicehash());

        miner.send(r#"{"id":1,"method":"mining.authorize","params":["worker"]}"#).await;
        assert_eq!(miner.expect_frame().await["error"], json!([25, "Not subscribed", null]));

        miner.send(r#"{"id":2,"method":"mining.extranonce.subscribe","params":[]}"#).await;
        assert_eq!(miner.expect_frame().await["error"], json!([24, "Unauthorized worker", null]));

        miner.send(r#"{"id":3,"method":"mining.subscribe","params":[]}"#).await;
        assert!(miner.expect_frame().await["error"].is_null());

        miner.send(r#"{"id":4,"method":"mining.subscribe","params":[]}"#).await;
        assert_eq!(miner.expect_frame().await["error"], json!([20, "Already subscribed", null]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_configure_echoes_extensions_with_mask() {
        let mut miner = Miner::connect(Personality::mrr());
        miner
            .send(r#"{"id":1,"method":"mining.configure","params":[["version-rolling"],{"version-rolling.mask":"ffffffff"}]}"#)
            .await;
        assert_eq!(
            miner.expect_frame().await["result"],
            json!([["version-rolling"], {"version-rolling.mask": "1fffe000"}])
        );

        miner.send(r#"{"id":2,"method":"mining.configure","params":[]}"#).await;
        assert_eq!(
            miner.expect_frame().await["result"],
            json!([[], {"version-rolling.mask": "1fffe000"}])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_and_unknown_lines_get_no_response() {
        let mut miner = Miner::connect(Personality::mrr());
        miner.send("this is not json").await;
        miner.send("[1,2,3]").await;
        miner.send("").await;
        miner.send(r#"{"id":8,"method":"mining.get_transactions","params":[]}"#).await;
        miner.send(r#"{"id":9,"method":"mining.suggest_difficulty","params":[512]}"#).await;
        miner.send(r#"{"id":1,"method":"mining.subscribe","params":[]}"#).await;

        let frame = miner.expect_frame().await;
        assert_eq!(frame["id"], 1, "first response belongs to the subscribe");
        assert_eq!(frame["result"][1], "8000845a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_reconnect_with_id_is_acknowledged() {
        let mut miner = Miner::connect(Personality::mrr());
        miner
            .send(r#"{"id":7,"method":"client.reconnect","params":["pool.example.org",3334,0]}"#)
            .await;
        assert_eq!(miner.expect_frame().await, json!({"id": 7, "result": true, "error": null}));
        assert!(miner.next_frame().await.is_none());
        assert_eq!(miner.session.await.unwrap(), CloseReason::ClientReconnect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_reconnect_without_id_closes_silently() {
        let mut miner = Miner::connect(Personality::nicehash());
        miner.send(r#"{"id":null,"method":"client.reconnect","params":[]}"#).await;
        assert!(miner.next_frame().await.is_none());
        assert_eq!(miner.session.await.unwrap(), CloseReason::ClientReconnect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_disconnect_mid_session_stops_jobs() {
        let mut miner = Miner::connect(Personality::nicehash());
        miner.handshake().await;
        miner.writer.shutdown().await.unwrap();

        let mut remaining = 0;
        while let Some(frame) = miner.next_frame().await {
            assert_ne!(frame["method"], "client.reconnect");
            remaining += 1;
        }
        assert!(remaining <= 1, "at most the announce got out before teardown");
        assert_eq!(miner.session.await.unwrap(), CloseReason::ClientDisconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_are_crlf_terminated() {
        let (miner, pool) = tokio::io::duplex(4096);
        let (pool_read, pool_write) = tokio::io::split(pool);
        let session = Session::new(3, "miner".to_string(), Personality::mrr(), ReconnectDirective::default(), pool_write);
        tokio::spawn(session.run(pool_read));

        let (miner_read, mut miner_write) = tokio::io::split(miner);
        miner_write
            .write_all(b"{\"id\":1,\"method\":\"mining.subscribe\",\"params\":[]}\r\n")
            .await
            .unwrap();

        let mut reader = BufReader::new(miner_read);
        let mut raw = Vec::new();
        reader.read_until(b'\n', &mut raw).await.unwrap();
        assert!(raw.ends_with(b"\r\n"));
        let frame: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(frame["result"][0][1][1], "sub-0003");
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_line_closes_session() {
        let mut miner = Miner::connect(Personality::mrr());
        // No terminator: the pool gives up once the line passes the limit
        let flood = vec![b'a'; MAX_FRAME_LENGTH + 4 * 1024];
        let _ = miner.writer.write_all(&flood).await;

        assert!(miner.next_frame().await.is_none(), "no response to an oversized line");
        assert_eq!(miner.session.await.unwrap(), CloseReason::OversizedFrame);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_utf8_closes_session() {
        let mut miner = Miner::connect(Personality::mrr());
        miner.writer.write_all(&[0xff, 0xfe, b'\n']).await.unwrap();

        assert!(miner.next_frame().await.is_none());
        assert_eq!(miner.session.await.unwrap(), CloseReason::ReadError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_line_at_limit_is_still_parsed() {
        let mut miner = Miner::connect(Personality::mrr());
        let request = r#"{"id":1,"method":"mining.subscribe","params":[]}"#;
        let padded = format!("{}{}", " ".repeat(MAX_FRAME_LENGTH - request.len()), request);
        assert_eq!(padded.len(), MAX_FRAME_LENGTH);
        miner.send(&padded).await;

        assert_eq!(miner.expect_frame().await["id"], 1);
    }
}

// Changelog:
// - v1.1.0 (2026-10-16): Cadence checks on notify arrival times.
//   - Rotation lands before job 0005.
//   - Oversized and non-UTF-8 lines end the session.
// - v1.0.0 (2026-10-14): Session scenarios over duplex pipes.
