//! The root entry-point template written as `<Name>.psm1`.

/// Substitution values for [`ENTRY_POINT_TEMPLATE`].
#[derive(Debug, Clone)]
pub struct EntryPointValues<'a> {
    pub module_name: &'a str,
    pub namespace: &'a str,
    pub dependency_name: &'a str,
    /// Empty when compilation was skipped
    pub dependency_version: &'a str,
}

/// Loads the compiled module for the running edition, dot-sources helpers
/// and the generated command scripts.
pub const ENTRY_POINT_TEMPLATE: &str = r#"Microsoft.PowerShell.Core\Set-StrictMode -Version Latest
Microsoft.PowerShell.Utility\Import-LocalizedData LocalizedData -FileName {{ModuleName}}.Resources.psd1

$script:ClientRuntimeName = '{{DependencyName}}'
$script:ClientRuntimeVersion = '{{DependencyVersion}}'

if ('Core' -eq $PSEdition) {
    $clr = 'coreclr'
} else {
    $clr = 'fullclr'
}

$dllPath = Join-Path -Path $PSScriptRoot -ChildPath "ref/$clr/{{Namespace}}.dll"
if (Test-Path -Path $dllPath -PathType Leaf) {
    $null = Add-Type -Path $dllPath -PassThru
} elseif ($script:ClientRuntimeVersion) {
    throw ($LocalizedData.CompiledAssemblyMissing -f $dllPath)
}

. (Join-Path -Path $PSScriptRoot -ChildPath 'GeneratedHelpers.ps1')

Get-ChildItem -Path (Join-Path -Path $PSScriptRoot -ChildPath 'Generated.PowerShell.Commands') -Recurse -Filter *.ps1 -File |
    ForEach-Object { . $_.FullName }
"#;

/// Substitute every `{{Key}}` placeholder.
pub fn render_entry_point(values: &EntryPointValues<'_>) -> String {
    render(
        ENTRY_POINT_TEMPLATE,
        &[
            ("ModuleName", values.module_name),
            ("Namespace", values.namespace),
            ("DependencyName", values.dependency_name),
            ("DependencyVersion", values.dependency_version),
        ],
    )
}

fn render(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), &value.replace('\'', "''"))
    })
}
