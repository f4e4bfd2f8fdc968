//! Embedded pages.
//!
//! The form page is self-contained (no external resources) and talks
//! to the JSON endpoints under `/api/`. All form state lives on the
//! server; the page renders whatever `FormView` it is handed, so a
//! session change made elsewhere shows up on the next render.

use axum::response::Html;

/// `GET /` and `GET /addHealthInfo[/{patient_id}]` — the submission form.
pub async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE_HTML)
}

/// `GET /healthInfo/{patient_id}` — landing page after a successful save.
pub async fn confirmation_page() -> Html<&'static str> {
    Html(CONFIRMATION_PAGE_HTML)
}

// ---------------------------------------------------------------------------
// Form page HTML (self-contained, mobile-optimized, no external resources)
// ---------------------------------------------------------------------------

const FORM_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1">
  <title>Aftercare — Daily Health Info</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      min-height: 100vh; display: flex; flex-direction: column;
      align-items: center; padding: 24px;
    }
    h1 { font-size: 24px; margin-bottom: 8px; }
    p.lead { color: #78716c; font-size: 14px; margin-bottom: 24px; text-align: center; max-width: 420px; }
    .card { width: 100%; max-width: 420px; }
    .field { margin-bottom: 16px; }
    .field label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; }
    .field input {
      width: 100%; padding: 12px; font-size: 16px;
      border: 2px solid #d6d3d1; border-radius: 12px; outline: none;
    }
    .field input:focus { border-color: #4a7c59; }
    .warn { color: #b45309; font-size: 13px; margin-top: 4px; min-height: 16px; }
    .btn {
      display: flex; align-items: center; justify-content: center;
      padding: 16px; border-radius: 12px; font-size: 16px; font-weight: 500;
      cursor: pointer; border: none; min-height: 56px; width: 100%;
      background: #4a7c59; color: white; margin-top: 8px;
    }
    .btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .status { margin-top: 16px; text-align: center; min-height: 20px; }
    .status.error { color: #dc2626; }
  </style>
</head>
<body>
  <h1>Daily Health Info</h1>
  <p class="lead">Enter your daily vital signs during the first week after releasing from the hospital.</p>

  <div class="card">
    <div class="field" id="patient-row" style="display:none">
      <label for="patientId">Patient ID</label>
      <input type="text" id="patientId" autocomplete="off">
      <div class="warn" id="warn-patientId"></div>
    </div>

    <div class="field">
      <label for="date">Date</label>
      <input type="date" id="date" autocomplete="off">
      <div class="warn" id="warn-date"></div>
    </div>

    <div class="field">
      <label for="weight">Weight (kg)</label>
      <input type="text" id="weight" inputmode="numeric" autocomplete="off">
      <div class="warn" id="warn-weight"></div>
    </div>

    <div class="field">
      <label for="temperature">Temperature (&deg;C)</label>
      <input type="text" id="temperature" inputmode="numeric" autocomplete="off">
      <div class="warn" id="warn-temperature"></div>
    </div>

    <div class="field">
      <label for="bloodPressure">Blood Pressure (mm Hg)</label>
      <input type="text" id="bloodPressure" inputmode="numeric" autocomplete="off">
      <div class="warn" id="warn-bloodPressure"></div>
    </div>

    <div class="field">
      <label for="pulseRate">Pulse Rate (beats per minute)</label>
      <input type="text" id="pulseRate" inputmode="numeric" autocomplete="off">
      <div class="warn" id="warn-pulseRate"></div>
    </div>

    <div class="field">
      <label for="respiratoryRate">Respiratory Rate (breaths per minute)</label>
      <input type="text" id="respiratoryRate" inputmode="numeric" autocomplete="off">
      <div class="warn" id="warn-respiratoryRate"></div>
    </div>

    <button class="btn" id="btn-save" disabled>SAVE</button>
    <div class="status" id="status"></div>
  </div>

  <script>
    var FIELDS = ['patientId', 'date', 'weight', 'temperature', 'bloodPressure', 'pulseRate', 'respiratoryRate'];
    var NUMERIC = {
      weight: { label: 'Weight', validity: 'weight' },
      temperature: { label: 'Temperature', validity: 'temperature' },
      bloodPressure: { label: 'Blood Pressure', validity: 'blood_pressure' },
      pulseRate: { label: 'Pulse Rate', validity: 'pulse_rate' },
      respiratoryRate: { label: 'Respiratory Rate', validity: 'respiratory_rate' }
    };
    var saveBtn = document.getElementById('btn-save');
    var statusEl = document.getElementById('status');

    function api(method, path, body, done) {
      var xhr = new XMLHttpRequest();
      xhr.open(method, path);
      xhr.setRequestHeader('Content-Type', 'application/json');
      xhr.onload = function() {
        var resp = null;
        try { resp = JSON.parse(xhr.responseText); } catch (_) {}
        done(xhr.status, resp);
      };
      xhr.onerror = function() { done(0, null); };
      xhr.send(body ? JSON.stringify(body) : '{}');
    }

    function routePatientId() {
      var parts = window.location.pathname.split('/');
      if (parts[1] === 'addHealthInfo' && parts[2]) return decodeURIComponent(parts[2]);
      return null;
    }

    function fill(view) {
      FIELDS.forEach(function(name) {
        var value = view.draft[name];
        document.getElementById(name).value = (value === null || value === undefined) ? '' : value;
      });
    }

    function render(view) {
      document.getElementById('patient-row').style.display = view.is_nurse ? '' : 'none';

      Object.keys(NUMERIC).forEach(function(name) {
        var ok = view.validity[NUMERIC[name].validity];
        document.getElementById('warn-' + name).textContent =
          ok ? '' : NUMERIC[name].label + ' must be greater than 0';
      });

      var outcome = view.outcome;
      if (outcome.state === 'success') {
        window.location.href = outcome.redirect_to;
        return;
      }
      saveBtn.disabled = outcome.state === 'pending';
      if (outcome.state === 'pending') {
        showStatus('Saving...', '');
      } else if (outcome.state === 'failure') {
        showStatus(outcome.message, 'error');
      } else {
        showStatus('', '');
      }
    }

    function showStatus(text, type) {
      statusEl.textContent = text;
      statusEl.className = 'status ' + type;
    }

    FIELDS.forEach(function(name) {
      document.getElementById(name).addEventListener('change', function(e) {
        api('PATCH', '/api/form/field', { field: name, value: e.target.value }, function(status, view) {
          if (status === 200) render(view);
        });
      });
    });

    saveBtn.addEventListener('click', function() {
      saveBtn.disabled = true;
      api('POST', '/api/form/submit', null, function(status, resp) {
        if (status === 200) {
          render(resp);
        } else if (resp && resp.error) {
          saveBtn.disabled = false;
          showStatus(resp.error.message, 'error');
        } else {
          saveBtn.disabled = false;
          showStatus('Connection failed. Please try again.', 'error');
        }
      });
    });

    api('POST', '/api/form/open', { patient_id: routePatientId() }, function(status, view) {
      if (status === 200) {
        fill(view);
        render(view);
      } else {
        showStatus('Could not load the form. Please refresh.', 'error');
      }
    });
  </script>
</body>
</html>"#;

// ---------------------------------------------------------------------------
// Confirmation page HTML
// ---------------------------------------------------------------------------

const CONFIRMATION_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1">
  <title>Aftercare — Saved</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917;
      min-height: 100vh; display: flex; flex-direction: column;
      align-items: center; justify-content: center; padding: 24px;
    }
    h1 { font-size: 24px; margin-bottom: 8px; color: #16a34a; }
    p { color: #78716c; font-size: 14px; margin-bottom: 24px; text-align: center; }
    a {
      display: flex; align-items: center; justify-content: center;
      padding: 16px 24px; border-radius: 12px; font-size: 16px; font-weight: 500;
      background: white; color: #44403c; border: 1px solid #d6d3d1;
      text-decoration: none;
    }
  </style>
</head>
<body>
  <h1>Health info saved</h1>
  <p>Today's reading for patient <strong id="pid"></strong> was sent to the care team.</p>
  <a id="again" href="/">Enter another reading</a>

  <script>
    var parts = window.location.pathname.split('/');
    var pid = parts[2] ? decodeURIComponent(parts[2]) : '';
    document.getElementById('pid').textContent = pid;
    if (pid) {
      document.getElementById('again').href = '/addHealthInfo/' + encodeURIComponent(pid);
    }
  </script>
</body>
</html>"#;
