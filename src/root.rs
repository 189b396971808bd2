use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::RUNTIME_VERSION;

/// Picks the directory to serve static files from, in priority order:
/// the build output, the client's public assets, and finally a synthesized
/// `temp_public` directory holding a single emergency index page.
///
/// Resolved once at startup; the path is handed to the file-serving layer
/// instead of changing the process working directory.
pub fn resolve(base: &Path) -> anyhow::Result<PathBuf> {
    let dist = base.join("dist").join("public");
    if dist.is_dir() {
        info!("Serving from: {}", dist.display());
        return Ok(dist);
    }

    let client_public = base.join("client").join("public");
    if client_public.is_dir() {
        info!("Serving from: {}", client_public.display());
        return Ok(client_public);
    }

    let temp = base.join("temp_public");
    fs::create_dir_all(&temp)?;
    fs::write(temp.join("index.html"), emergency_page(&temp))?;
    info!("Serving from temporary: {}", temp.display());
    Ok(temp)
}

fn emergency_page(root: &Path) -> String {
    EMERGENCY_PAGE
        .replace("{{version}}", RUNTIME_VERSION)
        .replace("{{platform}}", std::env::consts::OS)
        .replace("{{root}}", &root.display().to_string())
}

const EMERGENCY_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Emergency Fallback Server</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background: #f0f0f0; }
        .container { max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; }
        .status { color: #28a745; font-weight: bold; }
        .api-test { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 4px; }
        button { background: #007bff; color: white; padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer; }
        button:hover { background: #0056b3; }
        pre { background: #e9ecef; padding: 10px; border-radius: 4px; overflow-x: auto; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Emergency Fallback Server</h1>
        <p class="status">Status: ACTIVE</p>
        <p>The primary server is down; this fallback is keeping the app reachable.</p>
        <p>Time: <span id="time"></span></p>

        <div class="api-test">
            <h3>API Test</h3>
            <button onclick="testHealth()">Test /api/health</button>
            <button onclick="testStocks()">Test /api/stocks</button>
            <div id="api-result"></div>
        </div>

        <div class="api-test">
            <h3>Server Information</h3>
            <pre id="server-info">
Server: {{version}} (emergency mode)
Platform: {{platform}}
Content root: {{root}}
            </pre>
        </div>
    </div>

    <script>
        function updateTime() {
            document.getElementById('time').textContent = new Date().toISOString();
        }
        updateTime();
        setInterval(updateTime, 1000);

        async function testEndpoint(path) {
            const result = document.getElementById('api-result');
            try {
                const response = await fetch(path);
                const data = await response.json();
                result.innerHTML = '<h4>' + path + ' response:</h4><pre>'
                    + JSON.stringify(data, null, 2) + '</pre>';
            } catch (error) {
                result.innerHTML = '<h4>' + path + ' error:</h4><pre>'
                    + error.message + '</pre>';
            }
        }

        function testHealth() { testEndpoint('/api/health'); }
        function testStocks() { testEndpoint('/api/stocks'); }

        console.log('Emergency fallback server is active');
    </script>
</body>
</html>
"#;
