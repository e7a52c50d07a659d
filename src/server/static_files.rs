//! Stylesheet and browser script served alongside the rendered page.

pub const STYLE_CSS: &str = r#"@import url('https://fonts.googleapis.com/css2?family=Outfit:wght@400;500;600;700;800;900&display=swap');
*, *::before, *::after { box-sizing: border-box; -webkit-tap-highlight-color: transparent; }
html { touch-action: manipulation; -webkit-text-size-adjust: 100%; }
body {
  margin: 0; padding: 0; overscroll-behavior: none;
  font-family: 'Outfit', system-ui, sans-serif; color: #1e293b;
  background: linear-gradient(135deg, #fff7ed 0%, #fefce8 50%, #f8fafc 100%);
  min-height: 100vh;
}
.card {
  background: rgba(255,255,255,0.72); border: 1px solid rgba(255,255,255,0.9);
  border-radius: 20px; padding: 18px; backdrop-filter: blur(20px);
  box-shadow: 0 4px 24px rgba(15,23,42,0.06);
}
h2, h3 { margin: 0 0 12px; letter-spacing: -0.02em; }
small { font-size: 0.58rem; color: #94a3b8; font-weight: 600; margin-left: 2px; }

/* loading / failed */
.screen { min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 6px; padding: 24px; }
.spinner svg { width: 76px; height: 76px; }
.spin { transform-origin: 38px 38px; animation: spinCW 1.2s linear infinite; }
.loading-title { font-weight: 800; font-size: 1.05rem; margin: 0; }
.loading-hint { font-size: 0.7rem; color: #94a3b8; margin: 6px 0 0; }
.error-card { max-width: 420px; text-align: center; }
.error-icon { font-size: 2.4rem; margin: 0; }
.error-reason { font-size: 0.75rem; color: #ea580c; word-break: break-word; }
.error-hint { font-size: 0.7rem; color: #94a3b8; }

/* shared */
.brand-name { font-weight: 900; font-size: 1.4rem; color: #f97316; }
.brand-name span { color: #1e293b; }
.brand-sub { display: block; font-size: 0.62rem; color: #94a3b8; font-weight: 600; margin-top: 2px; }
.clock-box { text-align: right; }
.clock-caption { display: block; font-size: 0.5rem; color: #94a3b8; font-weight: 700; letter-spacing: 0.12em; }
.clock { font-weight: 900; font-size: 2rem; color: #f97316; line-height: 1; font-variant-numeric: tabular-nums; }
.gps { font-size: 0.68rem; color: #64748b; font-weight: 600; }
.gps::before { content: ''; display: inline-block; width: 7px; height: 7px; border-radius: 50%; margin-right: 5px; background: #94a3b8; }
.gps-accurate::before { background: #22c55e; animation: livepulse 2s infinite; }
.gps-ip::before { background: #0ea5e9; }
.coords, .date { font-size: 0.68rem; color: #94a3b8; font-variant-numeric: tabular-nums; }
.weather-head { display: flex; align-items: center; gap: 12px; margin: 10px 0; }
.weather-icon { font-size: 3rem; }
.temp { font-weight: 900; font-size: 2.6rem; line-height: 1; }
.feels { font-size: 0.7rem; color: #94a3b8; }
.desc { font-weight: 600; font-size: 0.85rem; color: #64748b; }
.ring { display: flex; flex-direction: column; align-items: center; gap: 4px; }
.ring-dial { position: relative; width: var(--size); height: var(--size); }
.ring-dial svg { width: 100%; height: 100%; }
.ring-dial circle + circle { transition: stroke-dasharray 1.8s cubic-bezier(.4,0,.2,1); }
.ring-value { position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; }
.ring-value b { font-weight: 800; font-size: calc(var(--size) * 0.24); line-height: 1; }
.ring-value span { font-size: calc(var(--size) * 0.115); color: #94a3b8; }
.ring-label { font-size: 0.7rem; font-weight: 700; letter-spacing: 0.07em; text-transform: uppercase; color: #94a3b8; }
.rings { display: flex; justify-content: space-around; gap: 8px; margin-bottom: 14px; }
.pill { display: flex; flex-direction: column; padding: 8px 10px; border-radius: 12px; background: rgba(248,250,252,0.8); }
.pill-label { font-size: 0.58rem; color: #94a3b8; font-weight: 600; text-transform: uppercase; letter-spacing: 0.07em; }
.pill-value { font-weight: 800; font-size: 1rem; font-variant-numeric: tabular-nums; }
.spark { width: 100%; height: 60px; display: block; }
.chart-label { font-size: 0.6rem; font-weight: 700; }

/* desktop */
.desk { display: flex; flex-direction: column; gap: 16px; padding: 20px 28px; max-width: 1400px; margin: 0 auto; }
.topbar { display: flex; align-items: center; justify-content: space-between; }
.topbar-meta { display: flex; gap: 14px; align-items: center; }
.grid { display: grid; grid-template-columns: 1fr 1.2fr 1.4fr; gap: 16px; }
.live { font-size: 0.55rem; font-weight: 800; color: #22c55e; letter-spacing: 0.12em; }
.city { font-weight: 900; font-size: 1.45rem; margin-top: 10px; }
.region { font-size: 0.65rem; color: #94a3b8; margin-top: 4px; }
.mini-stats, .pills { display: grid; grid-template-columns: 1fr 1fr; gap: 8px; }
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
.chart { display: flex; flex-direction: column; }
.source { display: flex; justify-content: space-between; font-size: 0.58rem; color: #94a3b8; margin-top: 12px; }

/* mobile */
.mob { display: flex; flex-direction: column; gap: 12px; padding: 14px; }
.mob-header { display: flex; justify-content: space-between; align-items: center; }
.mob .clock { font-size: clamp(1.1rem, 4.5vw, 1.45rem); }
.gps-bar { display: flex; justify-content: space-between; align-items: center; padding: 6px 10px; border-radius: 50px; background: rgba(255,255,255,0.6); }
.stats { display: grid; grid-template-columns: 1fr 1fr; gap: 8px; }
.stat p { font-size: 0.62rem; color: #94a3b8; margin: 0 0 2px; }
.stat b { font-size: clamp(0.88rem, 3.2vw, 1rem); font-variant-numeric: tabular-nums; }
.mob .charts { grid-template-columns: 1fr; }
.mob-chart { display: flex; flex-direction: column; }
.footer { display: flex; justify-content: space-between; font-size: 0.58rem; color: #94a3b8; }
.footer p { margin: 0; }

/* toast */
.toast {
  position: fixed; top: 16px; left: 50%; transform: translateX(-50%); z-index: 999;
  display: flex; align-items: center; gap: 6px; white-space: nowrap;
  background: rgba(249,115,22,0.1); border: 1px solid rgba(249,115,22,0.3);
  border-radius: 50px; padding: 7px 16px; backdrop-filter: blur(20px);
  font-weight: 700; font-size: 0.75rem; color: #ea580c;
  animation: toastIn 0.4s cubic-bezier(.34,1.56,.64,1);
}
.toast[hidden] { display: none; }

@keyframes spinCW    { to { transform: rotate(360deg); } }
@keyframes livepulse { 0%,100% { opacity: .4; transform: scale(1); } 50% { opacity: 1; transform: scale(1.5); } }
@keyframes toastIn   { from { opacity: 0; transform: translateX(-50%) translateY(-10px) scale(.9); } to { opacity: 1; transform: translateX(-50%) translateY(0) scale(1); } }
"#;

pub const APP_JS: &str = r#"(function () {
  'use strict';

  var DESKTOP = '(min-width: 1024px)';
  var body = document.body;
  var revision = Number(body.dataset.revision);
  var layout = body.dataset.layout;

  // Pinch zoom stays locked even where the viewport meta is ignored.
  function block(e) { e.preventDefault(); }
  document.addEventListener('touchmove', function (e) {
    if (e.touches.length > 1) e.preventDefault();
  }, { passive: false });
  document.addEventListener('gesturestart', block);
  document.addEventListener('gesturechange', block);

  function wanted() {
    return window.matchMedia(DESKTOP).matches ? 'desktop' : 'mobile';
  }

  function reload() {
    var url = new URL(window.location.href);
    url.searchParams.set('width', String(window.innerWidth));
    window.location.replace(url.toString());
  }

  if (wanted() !== layout) {
    reload();
    return;
  }
  window.matchMedia(DESKTOP).addEventListener('change', reload);

  var clock = document.getElementById('clock');
  var dots = document.getElementById('dots');
  var toast = document.getElementById('toast');

  function poll() {
    fetch('/api/state', { cache: 'no-store' })
      .then(function (r) { return r.json(); })
      .then(function (s) {
        if (s.revision !== revision) {
          reload();
          return;
        }
        if (clock) clock.textContent = s.clock;
        if (dots) dots.textContent = s.loading_dots;
        if (toast) toast.hidden = !s.weather_changed;
        schedule(s.phase.state === 'loading' ? 400 : 1000);
      })
      .catch(function () { schedule(5000); });
  }

  function schedule(ms) {
    window.setTimeout(poll, ms);
  }

  schedule(body.dataset.phase === 'loading' ? 400 : 1000);
})();
"#;
