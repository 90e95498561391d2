use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while binding TCP server, error: {source}"))]
    BindTcpServer { source: std::io::Error },

    #[snafu(display("Error occurs while serving HTTP server, error: {message}"))]
    ServeHttpServer { message: String },
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use tokio::net::TcpListener;

    use crate::web;

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let address = taken.local_addr().unwrap();

        let err = web::bind_listener(address).await.unwrap_err();

        assert!(matches!(err, super::Error::BindTcpServer { .. }));
        assert!(err.to_string().starts_with("Error occurs while binding TCP server"));
    }
}
